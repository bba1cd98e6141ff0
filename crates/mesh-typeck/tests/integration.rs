//! End-to-end atomizer tests driven through `mesh_parser::parse` +
//! `mesh_typeck::check`, the way a caller actually uses this crate.

use mesh_typeck::error::TypeError;
use mesh_typeck::{check, CheckResult};

fn run(src: &str) -> CheckResult {
    let module = mesh_parser::parse(src).expect("should parse");
    check(&module)
}

fn assert_clean(src: &str) {
    let result = run(src);
    assert!(result.is_ok(), "expected no errors, got: {:?}", result.errors);
}

fn assert_has_error<F: Fn(&TypeError) -> bool>(src: &str, pred: F, desc: &str) {
    let result = run(src);
    assert!(
        result.errors.iter().any(|e| pred(e)),
        "expected error matching `{desc}`, got: {:?}",
        result.errors
    );
}

#[test]
fn annotated_functions_type_check_across_calls() {
    assert_clean(
        "def add(a: int, b: int) -> int:\n    return a + b\n\ndef double(x: int) -> int:\n    return add(x, x)\n\ndouble(3)\n",
    );
}

#[test]
fn class_methods_are_bound_and_callable() {
    assert_clean(
        "class Point:\n    def dist(self: object) -> int:\n        return 0\n\np = Point()\np.dist()\n",
    );
}

#[test]
fn undefined_name_is_reported_with_a_span() {
    assert_has_error("print(missing)\n", |e| matches!(e, TypeError::UndefinedName { name, .. } if name == "missing"), "UndefinedName");
}

#[test]
fn calling_a_string_is_reported() {
    assert_has_error("s = \"hi\"\ns()\n", |e| matches!(e, TypeError::NotCallable { .. }), "NotCallable");
}

#[test]
fn wrong_attribute_name_is_reported() {
    assert_has_error(
        "class Point:\n    def dist(self: object) -> int:\n        return 0\n\np = Point()\np.nope()\n",
        |e| matches!(e, TypeError::NoSuchAttribute { attr, .. } if attr == "nope"),
        "NoSuchAttribute",
    );
}

#[test]
fn too_many_positional_arguments_is_reported() {
    assert_has_error(
        "def f(a: int) -> int:\n    return a\nf(1, 2)\n",
        |e| matches!(e, TypeError::TooManyArguments { .. }),
        "TooManyArguments",
    );
}

#[test]
fn unexpected_keyword_argument_is_reported() {
    assert_has_error(
        "def f(a: int) -> int:\n    return a\nf(a=1, b=2)\n",
        |e| matches!(e, TypeError::UnexpectedKeywordArgument { name, .. } if name == "b"),
        "UnexpectedKeywordArgument",
    );
}

#[test]
fn for_loop_over_a_non_iterable_is_reported() {
    assert_has_error(
        "x = 1\nfor y in x:\n    pass\n",
        |e| matches!(e, TypeError::NotIterable { .. }),
        "NotIterable",
    );
}

#[test]
fn for_loop_over_a_list_binds_its_element_type() {
    assert_clean("for n in [1, 2, 3]:\n    print(n.bit_length())\n");
}

#[test]
fn union_annotation_accepts_either_member() {
    assert_clean(
        "def f(x: int | str) -> int | str:\n    return x\nf(1)\nf(\"a\")\n",
    );
}

#[test]
fn type_mode_rejects_addition_between_annotations() {
    assert_has_error(
        "def f(x: int + str) -> int:\n    return 0\n",
        |e| matches!(e, TypeError::UnsupportedOperator { .. }),
        "UnsupportedOperator",
    );
}
