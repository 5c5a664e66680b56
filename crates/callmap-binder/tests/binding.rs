//! Integration tests for compiling and calling methods.
//!
//! Covers each declaration shape (bare handler, bare names, records with and
//! without names, mixed lists) under the default name mapping and under
//! positional binding, plus optional, parse and validate behavior.

use callmap_binder::{parse, Binder, CompiledMethod};
use callmap_core::{
    handler_fn, ArgBag, ArgDecl, ArgSpec, ErrorKind, HandlerRef, MethodDefinition, MethodSpec,
    Rejection,
};
use serde_json::{json, Value};

/// Handler returning its arguments as a JSON array, undefined as `"<undefined>"`.
fn echo(params: &[&str]) -> HandlerRef {
    handler_fn(params.iter().copied(), |_ctx, args| {
        Ok(Value::Array(
            args.into_iter()
                .map(|a| a.unwrap_or_else(|| json!("<undefined>")))
                .collect(),
        ))
    })
}

/// Handler adding its numeric arguments.
fn sum(params: &[&str]) -> HandlerRef {
    handler_fn(params.iter().copied(), |_ctx, args| {
        let total: f64 = args.iter().flatten().filter_map(Value::as_f64).sum();
        Ok(json!(total))
    })
}

/// Handler concatenating its string arguments.
fn concat(params: &[&str]) -> HandlerRef {
    handler_fn(params.iter().copied(), |_ctx, args| {
        let joined: String = args.iter().flatten().filter_map(Value::as_str).collect();
        Ok(json!(joined))
    })
}

fn compile(definition: impl Into<MethodDefinition>) -> CompiledMethod {
    Binder::new()
        .compile("test.method", &definition.into())
        .expect("method should compile")
}

fn compile_positional(definition: impl Into<MethodDefinition>) -> CompiledMethod {
    Binder::positional()
        .compile("test.method", &definition.into())
        .expect("method should compile")
}

fn bag(value: Value) -> ArgBag {
    ArgBag::try_from(value).expect("bag must be a JSON object")
}

mod load_time {
    use super::*;

    #[test]
    fn test_rejects_arity_mismatch() {
        let three = MethodSpec::new(echo(&["a", "b", "c"])).args(["a", "b"]);
        let err = Binder::new().compile("m", &three.into()).unwrap_err();
        assert_eq!(err.code(), "invalid_arg_list");

        let zero = MethodSpec::new(echo(&[])).args(["a"]);
        let err = Binder::new().compile("m", &zero.into()).unwrap_err();
        assert_eq!(err.code(), "invalid_arg_list");
    }

    #[test]
    fn test_arity_applies_to_record_lists_too() {
        let spec = MethodSpec::new(echo(&["a", "b"])).args([ArgSpec::new()]);
        let err = Binder::new().compile("m", &spec.into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgList);
        assert!(err.kind().is_load_time());
    }

    #[test]
    fn test_compiling_twice_behaves_identically() {
        let spec = MethodSpec::new(sum(&["a", "b"])).args([
            ArgSpec::named("a").parse(parse::number),
            ArgSpec::named("b").optional().default_value(json!(1)),
        ]);
        let definition = MethodDefinition::from(spec);
        let first = Binder::new().compile("m", &definition).unwrap();
        let second = Binder::new().compile("m", &definition).unwrap();

        for input in [
            json!({ "a": "1" }),
            json!({ "a": "1", "b": 2 }),
            json!({ "b": 2 }),
            json!({ "a": "x" }),
            json!({ "a": 1, "c": 3 }),
        ] {
            let one = first.call(bag(input.clone())).map_err(|e| e.kind());
            let two = second.call(bag(input)).map_err(|e| e.kind());
            assert_eq!(one, two);
        }
    }
}

mod named_records {
    use super::*;

    fn method() -> CompiledMethod {
        compile(MethodSpec::new(sum(&["a", "b"])).args([
            ArgSpec::named("a").parse(parse::number),
            ArgSpec::named("b").parse(parse::number),
        ]))
    }

    #[test]
    fn test_missing_required() {
        let err = method().call(bag(json!({ "a": 1 }))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingArgument);
        assert_eq!(err.argument(), Some("b"));
    }

    #[test]
    fn test_unexpected_argument() {
        let err = method().call(bag(json!({ "a": 1, "b": 2, "c": 3 }))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedArgument);
        assert_eq!(err.argument(), Some("c"));
    }

    #[test]
    fn test_unexpected_wins_over_missing() {
        let err = method().call(bag(json!({ "c": 3 }))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedArgument);
    }

    #[test]
    fn test_invokes_handler() {
        let out = method().call(bag(json!({ "a": 1, "b": 2 }))).unwrap();
        assert_eq!(out, json!(3.0));
    }

    #[test]
    fn test_declared_names_replace_handler_names() {
        let spec = MethodSpec::new(echo(&["a", "bValue"]))
            .args([ArgSpec::named("a"), ArgSpec::named("b_value")]);
        let compiled = compile(spec);

        assert!(compiled.call(bag(json!({ "a": ".", "bValue": "." }))).is_err());
        assert!(compiled.call(bag(json!({ "a": ".", "b_value": "." }))).is_ok());
    }

    #[test]
    fn test_unmatched_name_fails_to_compile() {
        let spec = MethodSpec::new(echo(&["a", "b"])).args([ArgSpec::named("a"), ArgSpec::named("c")]);
        let err = Binder::new().compile("m", &spec.into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownHandlerArgument);
        assert_eq!(err.argument(), Some("c"));
    }
}

mod bare_names {
    use super::*;

    fn method() -> CompiledMethod {
        compile(
            MethodSpec::new(concat(&["firstName", "middleName", "lastName"]))
                .args(["last_name", "first_name", "middle_name"]),
        )
    }

    #[test]
    fn test_missing_required() {
        let err = method().call(bag(json!({ "first_name": "1" }))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingArgument);
    }

    #[test]
    fn test_unexpected_argument() {
        let err = method()
            .call(bag(json!({
                "firstName": "0",
                "first_name": "1",
                "middle_name": "2",
                "last_name": "3"
            })))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedArgument);
        assert_eq!(err.argument(), Some("firstName"));
    }

    #[test]
    fn test_binds_by_name_not_declaration_order() {
        let out = method()
            .call(bag(json!({ "last_name": "3", "middle_name": "2", "first_name": "1" })))
            .unwrap();
        assert_eq!(out, json!("123"));
    }
}

mod positional {
    use super::*;

    fn method() -> CompiledMethod {
        compile_positional(MethodSpec::new(concat(&["a", "b", "c"])).args(["x", "y", "z"]))
    }

    #[test]
    fn test_missing_required() {
        let err = method().call(bag(json!({ "x": "1" }))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingArgument);
    }

    #[test]
    fn test_unexpected_argument() {
        let err = method()
            .call(bag(json!({ "w": "0", "x": "1", "y": "2", "z": "3" })))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedArgument);
    }

    #[test]
    fn test_binds_by_position_regardless_of_bag_order() {
        let out = method().call(bag(json!({ "z": "3", "y": "2", "x": "1" }))).unwrap();
        assert_eq!(out, json!("123"));
    }

    #[test]
    fn test_mixed_strings_and_records() {
        let compiled = compile_positional(MethodSpec::new(concat(&["a", "b", "c"])).args([
            ArgDecl::from(ArgSpec::named("y")),
            ArgDecl::from("x"),
            ArgDecl::from(ArgSpec::new().parse(parse::string)),
        ]));

        let out = compiled
            .call(bag(json!({ "c": "3", "x": "2", "y": "1" })))
            .unwrap();
        assert_eq!(out, json!("123"));

        for rejected in [
            json!({ "a": "1", "b": "2", "c": "3" }),
            json!({ "x": "1", "y": "2", "z": "3" }),
        ] {
            let err = compiled.call(bag(rejected)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnexpectedArgument);
        }
    }
}

mod unnamed_records {
    use super::*;

    fn method() -> CompiledMethod {
        compile(MethodSpec::new(sum(&["a", "b"])).args([
            ArgSpec::new().parse(parse::number),
            ArgSpec::new().parse(parse::number),
        ]))
    }

    #[test]
    fn test_names_are_inferred_from_handler() {
        let names: Vec<_> = method().matcher().expected_names().to_vec();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            method().call(bag(json!({ "a": 1 }))).unwrap_err().kind(),
            ErrorKind::MissingArgument
        );
        assert_eq!(
            method()
                .call(bag(json!({ "a": 1, "b": 2, "c": 3 })))
                .unwrap_err()
                .kind(),
            ErrorKind::UnexpectedArgument
        );
    }

    #[test]
    fn test_invokes_handler() {
        let out = method().call(bag(json!({ "b": 2, "a": 1 }))).unwrap();
        assert_eq!(out, json!(3.0));
    }
}

mod no_declaration {
    use super::*;

    fn method() -> CompiledMethod {
        compile(sum(&["a", "b"]))
    }

    #[test]
    fn test_all_params_required() {
        let err = method().call(bag(json!({ "a": 1 }))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingArgument);
    }

    #[test]
    fn test_unexpected_argument() {
        let err = method().call(bag(json!({ "a": 1, "b": 2, "c": 3 }))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedArgument);
    }

    #[test]
    fn test_invokes_handler() {
        assert_eq!(method().call(bag(json!({ "a": 1, "b": 2 }))).unwrap(), json!(3.0));
    }
}

mod optional {
    use super::*;

    #[test]
    fn test_omitted_optional_is_undefined() {
        let compiled = compile(MethodSpec::new(echo(&["a"])).args([ArgSpec::named("a").optional()]));

        assert_eq!(compiled.call(ArgBag::new()).unwrap(), json!(["<undefined>"]));
        assert_eq!(
            compiled.call(bag(json!({ "a": "hello" }))).unwrap(),
            json!(["hello"])
        );
    }

    #[test]
    fn test_falsy_defaults_in_order() {
        let compiled = compile(MethodSpec::new(echo(&["a", "b", "c", "d"])).args([
            ArgSpec::named("a").optional().default_value(json!(0)),
            ArgSpec::named("b").optional().default_value(json!(false)),
            ArgSpec::named("c").optional().default_value(json!([])),
            ArgSpec::named("d").optional().default_value(json!("")),
        ]));

        let out = compiled.call(ArgBag::new()).unwrap();
        assert_eq!(out, json!([0, false, [], ""]));
    }

    #[test]
    fn test_explicit_undefined_takes_default() {
        let compiled = compile(
            MethodSpec::new(echo(&["a"]))
                .args([ArgSpec::named("a").optional().default_value(json!("fallback"))]),
        );

        let out = compiled.call(ArgBag::new().with_undefined("a")).unwrap();
        assert_eq!(out, json!(["fallback"]));
    }

    #[test]
    fn test_null_does_not_take_default() {
        let compiled = compile(
            MethodSpec::new(echo(&["a"]))
                .args([ArgSpec::named("a").optional().default_value(json!("fallback"))]),
        );

        let out = compiled.call(bag(json!({ "a": null }))).unwrap();
        assert_eq!(out, json!([null]));
    }
}

mod parse_and_validate {
    use super::*;

    #[test]
    fn test_falsy_coercion() {
        let zero_is_false = ArgSpec::named("argNum").parse(|v| {
            let nonzero = v != Some(json!(0));
            Ok(Some(Value::Bool(nonzero)))
        });
        let compiled = compile(MethodSpec::new(echo(&["argNum"])).args([zero_is_false]));

        let cases = [
            (json!(0), json!(false)),
            (json!(null), json!(true)),
            (json!(false), json!(true)),
            (json!(1), json!(true)),
        ];
        for (input, expected) in cases {
            let out = compiled.call(bag(json!({ "argNum": input }))).unwrap();
            assert_eq!(out, json!([expected]));
        }
    }

    #[test]
    fn test_validate_rejection_propagates() {
        let compiled = compile(MethodSpec::new(echo(&["arg"])).args([ArgSpec::new()
            .parse(parse::number)
            .validate(|v| match v.and_then(Value::as_f64) {
                Some(n) if n < 0.0 => Err(Rejection::new("negative_number")),
                _ => Ok(()),
            })]));

        let err = compiled.call(bag(json!({ "arg": -1 }))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert_eq!(err.rejection().map(|r| r.message.as_str()), Some("negative_number"));
        assert!(compiled.call(bag(json!({ "arg": 1 }))).is_ok());
    }

    #[test]
    fn test_validate_sees_parsed_value() {
        let compiled = compile(MethodSpec::new(echo(&["n"])).args([ArgSpec::named("n")
            .parse(parse::number)
            .validate(|v| {
                if v.is_some_and(Value::is_number) {
                    Ok(())
                } else {
                    Err(Rejection::new("not parsed"))
                }
            })]));

        assert_eq!(compiled.call(bag(json!({ "n": "5" }))).unwrap(), json!([5]));
    }

    #[test]
    fn test_parse_failure_is_validation_error() {
        let compiled =
            compile(MethodSpec::new(echo(&["n"])).args([ArgSpec::named("n").parse(parse::number)]));

        let err = compiled.call(bag(json!({ "n": "abc" }))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert_eq!(err.argument(), Some("n"));
    }

    #[test]
    fn test_rejection_does_not_poison_matcher() {
        let compiled =
            compile(MethodSpec::new(echo(&["n"])).args([ArgSpec::named("n").parse(parse::number)]));

        assert!(compiled.call(bag(json!({ "n": "abc" }))).is_err());
        assert!(compiled.call(bag(json!({}))).is_err());
        assert_eq!(compiled.call(bag(json!({ "n": "2" }))).unwrap(), json!([2]));
    }
}
