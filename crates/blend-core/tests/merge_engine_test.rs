//! Integration tests for the options merge engine

use blend_core::{
    Composer, ComposerConfig, Diagnostic, Instance, MergeContext, Options, Record, Value, fields,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn composer() -> Composer {
    Composer::new(ComposerConfig::production())
}

fn checking_composer() -> (Composer, Rc<RefCell<Vec<Diagnostic>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let config = ComposerConfig {
        debug_checks: true,
        ..ComposerConfig::default()
    };
    let composer = Composer::new(config).with_warn_handler(move |d| sink.borrow_mut().push(d.clone()));
    (composer, seen)
}

fn hook() -> Value {
    Value::func(|_| Value::Null)
}

fn hooks_of(options: &Options, field: &str) -> Vec<Value> {
    options.get(field).map(|v| v.to_sequence()).unwrap_or_default()
}

fn assert_same_sequence(actual: &[Value], expected: &[&Value]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!(a.same(e), "{a:?} is not {e:?}");
    }
}

#[test]
fn test_merge_with_empty_child_keeps_default_fields() {
    let parent = Options::new()
        .with("template", "<div/>")
        .with("delimiters", Value::list(["${", "}"]))
        .with("inheritAttrs", false);

    let merged = composer().merge(&parent, &Options::new(), None);

    for (field, value) in parent.entries() {
        assert!(merged.get(&field).unwrap().same(&value), "{field}");
    }
    assert_eq!(merged.len(), parent.len());
}

#[test]
fn test_hook_order_and_dedup() {
    let (a, b, c) = (hook(), hook(), hook());
    let parent = Options::new().with("created", Value::list([a.clone(), b.clone()]));

    let merged = composer().merge(&parent, &Options::new().with("created", c.clone()), None);
    assert_same_sequence(&hooks_of(&merged, "created"), &[&a, &b, &c]);

    let child = Options::new().with("created", Value::list([a.clone(), c.clone()]));
    let merged = composer().merge(&parent, &child, None);
    assert_same_sequence(&hooks_of(&merged, "created"), &[&a, &b, &c]);
}

#[test]
fn test_shared_mixin_hook_runs_once() {
    let shared = hook();
    let mixin = Options::new().with("mounted", shared.clone());
    let base = Options::new()
        .with(fields::MIXINS, Value::list([mixin.clone()]))
        .with("mounted", hook());
    let child = Options::new()
        .with(fields::EXTENDS, base)
        .with(fields::MIXINS, Value::list([mixin]));

    let merged = composer().merge(&Options::new(), &child, None);
    let mounted = hooks_of(&merged, "mounted");

    assert_eq!(mounted.len(), 2);
    assert!(mounted[0].same(&shared));
}

#[test]
fn test_precedence_extends_then_mixins_then_own() {
    let (h0, h1, h2, h3, h4) = (hook(), hook(), hook(), hook(), hook());
    let ancestor = Options::new()
        .with("template", "ancestor")
        .with("created", h0.clone());
    let p1 = Options::new()
        .with("template", "p1")
        .with("render", "p1")
        .with("created", h1.clone());
    let m1 = Options::new()
        .with("template", "m1")
        .with("render", "m1")
        .with("created", h2.clone());
    let m2 = Options::new()
        .with("template", "m2")
        .with("created", h3.clone());
    let child = Options::new()
        .with(fields::EXTENDS, p1)
        .with(fields::MIXINS, Value::list([m1, m2]))
        .with("created", h4.clone());

    let merged = composer().merge(&ancestor, &child, None);

    assert!(merged.get("template").unwrap().same(&Value::from("m2")));
    assert!(merged.get("render").unwrap().same(&Value::from("m1")));
    assert_same_sequence(&hooks_of(&merged, "created"), &[&h0, &h1, &h2, &h3, &h4]);

    child.set("template", "own");
    let merged = composer().merge(&ancestor, &child, None);
    assert!(merged.get("template").unwrap().same(&Value::from("own")));
}

#[test]
fn test_result_key_set_is_union() {
    let parent = Options::new()
        .with("template", "t")
        .with(fields::METHODS, Record::new().with("save", "save"));
    let mixin = Options::new().with("render", "r");
    let child = Options::new()
        .with(fields::MIXINS, Value::list([mixin]))
        .with(fields::COMPUTED, Record::new().with("total", "total"));

    let merged = composer().merge(&parent, &child, None);
    let mut keys = merged.keys();
    keys.sort();

    assert_eq!(keys, vec!["computed", "methods", "mixins", "render", "template"]);
}

#[test]
fn test_inputs_are_not_mutated() {
    let parent_methods = Record::new().with("save", "parent");
    let parent = Options::new().with(fields::METHODS, parent_methods.clone());
    let child = Options::new()
        .with(fields::PROPS, Value::list(["user-name"]))
        .with(fields::METHODS, Record::new().with("load", "child"));

    let merged = composer().merge(&parent, &child, None);

    assert_eq!(parent.keys(), vec!["methods"]);
    assert_eq!(parent_methods.keys(), vec!["save"]);
    assert!(child.get(fields::PROPS).unwrap().as_list().is_some());
    assert!(!child.is_merged());

    let methods = merged.get(fields::METHODS).unwrap();
    assert_eq!(methods.as_record().unwrap().keys(), vec!["save", "load"]);
    let props = merged.get(fields::PROPS).unwrap();
    assert_eq!(props.as_record().unwrap().keys(), vec!["userName"]);
}

#[test]
fn test_state_factories_merge_lazily_per_instance() {
    let calls = Rc::new(Cell::new(0));

    let counter = Rc::clone(&calls);
    let mixin = Options::new().with(
        fields::DATA,
        Value::func(move |_| {
            counter.set(counter.get() + 1);
            Value::Record(
                Record::new()
                    .with("count", 0)
                    .with("filters", Record::new().with("active", true)),
            )
        }),
    );
    let counter = Rc::clone(&calls);
    let definition = Options::new()
        .with(fields::MIXINS, Value::list([mixin]))
        .with(
            fields::DATA,
            Value::func(move |_| {
                counter.set(counter.get() + 1);
                Value::Record(
                    Record::new()
                        .with("count", 5)
                        .with("filters", Record::new().with("query", "")),
                )
            }),
        );

    let composer = composer();
    let resolved = composer.merge(&composer.base_options(), &definition, None);
    let first_instance = Instance::untracked();
    let second_instance = Instance::untracked();
    let first = composer.merge(&resolved, &Options::new(), Some(&first_instance));
    let second = composer.merge(&resolved, &Options::new(), Some(&second_instance));
    assert_eq!(calls.get(), 0);

    let state_of = |options: &Options, instance: &Instance| {
        let data = options.get(fields::DATA).unwrap();
        data.as_func().unwrap().call(instance).as_record().unwrap().clone()
    };
    let a = state_of(&first, &first_instance);
    let b = state_of(&second, &second_instance);
    assert_eq!(calls.get(), 4);

    assert!(a.get("count").unwrap().same(&Value::from(5)));
    let filters = a.get("filters").unwrap();
    assert_eq!(filters.as_record().unwrap().keys(), vec!["query", "active"]);
    assert!(!filters.same(&b.get("filters").unwrap()));
}

#[test]
fn test_instance_data_merges_into_resolved_data() {
    let composer = composer();
    let resolved = composer.merge(
        &Options::new(),
        &Options::new().with(
            fields::DATA,
            Value::func(|_| Value::Record(Record::new().with("inherited", 1))),
        ),
        None,
    );
    let instance = Instance::untracked();
    let own = Options::new().with(
        fields::DATA,
        Value::func(|_| Value::Record(Record::new().with("own", 2))),
    );

    let merged = composer.merge(&resolved, &own, Some(&instance));
    let state = merged.get(fields::DATA).unwrap().as_func().unwrap().call(&instance);

    assert_eq!(state.as_record().unwrap().keys(), vec!["own", "inherited"]);
}

#[test]
fn test_null_contributions_leave_inherited_values() {
    let created = hook();
    let parent = Options::new()
        .with(
            fields::DATA,
            Value::func(|_| Value::Record(Record::new().with("inherited", 1))),
        )
        .with("created", Value::list([created.clone()]));
    let child = Options::new()
        .with(fields::DATA, Value::Null)
        .with("created", Value::Null);

    let merged = composer().merge(&parent, &child, None);

    let instance = Instance::untracked();
    let state = merged.get(fields::DATA).unwrap().as_func().unwrap().call(&instance);
    assert_eq!(state.as_record().unwrap().keys(), vec!["inherited"]);
    assert_same_sequence(&hooks_of(&merged, "created"), &[&created]);
}

#[test]
fn test_restricted_fields_flagged_without_instance() {
    let (composer, seen) = checking_composer();
    let child = Options::new().with(fields::EL, "#app").with(fields::PROPS_DATA, Record::new());

    let merged = composer.merge(&Options::new(), &child, None);

    assert!(merged.get(fields::EL).unwrap().same(&Value::from("#app")));
    assert_eq!(
        seen.borrow().as_slice(),
        &[
            Diagnostic::RestrictedOption {
                option: "el".to_string()
            },
            Diagnostic::RestrictedOption {
                option: "propsData".to_string()
            },
        ]
    );

    let instance = Instance::untracked();
    composer.merge(&Options::new(), &child, Some(&instance));
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_invalid_component_names_do_not_block_merge() {
    let (composer, seen) = checking_composer();
    let child = Options::new().with(
        fields::COMPONENTS,
        Record::new().with("slot", "a").with("1st-card", "b").with("my-card", "c"),
    );

    let merged = composer.merge(&composer.base_options(), &child, None);

    let table = merged.get(fields::COMPONENTS).unwrap();
    assert_eq!(table.as_assets().unwrap().own_names().len(), 3);
    assert!(matches!(
        seen.borrow().as_slice(),
        [
            Diagnostic::ReservedComponentName { .. },
            Diagnostic::InvalidComponentName { .. }
        ]
    ));
}

#[test]
fn test_watch_handlers_accumulate_through_mixins() {
    let mixin = Options::new().with(fields::WATCH, Record::new().with("query", "fromMixin"));
    let child = Options::new()
        .with(fields::MIXINS, Value::list([mixin]))
        .with(fields::WATCH, Record::new().with("query", "own"));
    let parent = Options::new().with(fields::WATCH, Record::new().with("query", "inherited"));

    let merged = composer().merge(&parent, &child, None);
    let watch = merged.get(fields::WATCH).unwrap();
    let handlers: Vec<_> = watch
        .as_record()
        .unwrap()
        .get("query")
        .unwrap()
        .to_sequence()
        .iter()
        .map(|h| h.as_str().unwrap().to_string())
        .collect();

    assert_eq!(handlers, vec!["inherited", "fromMixin", "own"]);
}

#[test]
fn test_custom_strategy() {
    let mut composer = composer();
    composer.strategies_mut().register(
        "classes",
        |parent: Option<&Value>, child: Option<&Value>, _: &MergeContext<'_>, _: &str| {
            let joined = [parent, child]
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            Some(Value::from(joined))
        },
    );

    let parent = Options::new().with("classes", "card");
    let child = Options::new().with("classes", "card--wide");
    let merged = composer.merge(&parent, &child, None);

    assert!(merged.get("classes").unwrap().same(&Value::from("card card--wide")));
}
