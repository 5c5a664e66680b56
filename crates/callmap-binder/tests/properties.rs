//! Property tests for the matcher.

use callmap_binder::{Binder, CompiledMethod};
use callmap_core::{handler_fn, ArgBag, ArgSpec, ErrorKind, MethodSpec};
use proptest::prelude::*;
use serde_json::{json, Value};

const PARAMS: [&str; 3] = ["alpha", "beta", "gamma"];

fn method(optional: bool) -> CompiledMethod {
    let handler = handler_fn(PARAMS, |_ctx, args| {
        Ok(Value::Array(
            args.into_iter()
                .map(|a| a.unwrap_or_else(|| json!("<undefined>")))
                .collect(),
        ))
    });
    let args = PARAMS.map(|name| {
        let spec = ArgSpec::named(name);
        if optional {
            spec.optional().default_value(json!("default"))
        } else {
            spec
        }
    });
    Binder::new()
        .compile("prop.method", &MethodSpec::new(handler).args(args).into())
        .expect("method should compile")
}

fn falsy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!(0)),
        Just(json!(false)),
        Just(json!(null)),
        Just(json!("")),
        Just(json!([])),
    ]
}

fn unknown_key() -> impl Strategy<Value = String> {
    "[a-z]{1,8}".prop_filter("must not be declared", |k| !PARAMS.contains(&k.as_str()))
}

proptest! {
    #[test]
    fn test_falsy_values_are_supplied(a in falsy(), b in falsy(), c in falsy()) {
        let bag = ArgBag::new()
            .with("alpha", a.clone())
            .with("beta", b.clone())
            .with("gamma", c.clone());

        let required = method(false).call(bag.clone()).unwrap();
        prop_assert_eq!(&required, &json!([a, b, c]));

        let optional = method(true).call(bag).unwrap();
        prop_assert_eq!(optional, required);
    }

    #[test]
    fn test_omitted_required_is_missing(skip in 0usize..3, value in any::<i64>()) {
        let bag: ArgBag = PARAMS
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, name)| (*name, json!(value)))
            .collect();

        let err = method(false).call(bag).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::MissingArgument);
        prop_assert_eq!(err.argument(), Some(PARAMS[skip]));
    }

    #[test]
    fn test_unknown_keys_are_rejected(key in unknown_key(), supply_all in any::<bool>()) {
        let mut bag = ArgBag::new().with(key.clone(), json!(1));
        if supply_all {
            for name in PARAMS {
                bag.insert(name, Some(json!(1)));
            }
        }

        let err = method(false).call(bag).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::UnexpectedArgument);
        prop_assert_eq!(err.argument(), Some(key.as_str()));
    }

    #[test]
    fn test_binding_ignores_bag_order(order in Just(PARAMS.to_vec()).prop_shuffle()) {
        let bag: ArgBag = order.iter().map(|name| (*name, json!(name))).collect();
        let out = method(false).call(bag).unwrap();
        prop_assert_eq!(out, json!(PARAMS));
    }
}
