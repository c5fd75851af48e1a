mod common;
use common::*;
use nxbasic::mach::Runtime;

#[test]
fn test_precedence() {
    let mut r = Runtime::default();
    r.enter(r#"?1+2*3"#);
    assert_eq!(exec(&mut r), " 7 \n");
    r.enter(r#"?(1+2)*3"#);
    assert_eq!(exec(&mut r), " 9 \n");
    r.enter(r#"?2+7 MOD 4*2;2+7 MOD 4"#);
    assert_eq!(exec(&mut r), " 9  5 \n");
}

#[test]
fn test_left_assoc() {
    let mut r = Runtime::default();
    r.enter(r#"?1.5/2*3"#);
    assert_eq!(exec(&mut r), " 2.25 \n");
    r.enter(r#"?1.5/(2*3)"#);
    assert_eq!(exec(&mut r), " 0.25 \n");
    r.enter(r#"?10-4-3"#);
    assert_eq!(exec(&mut r), " 3 \n");
}

#[test]
fn test_power_binds_tighter_than_negation() {
    let mut r = Runtime::default();
    r.enter(r#"?-2^2;2^-1"#);
    assert_eq!(exec(&mut r), "-4  0.5 \n");
}

#[test]
fn test_integer_division() {
    let mut r = Runtime::default();
    r.enter(r#"?10/4;10\4;-7 MOD 2"#);
    assert_eq!(exec(&mut r), " 2.5  2 -1 \n");
}

#[test]
fn test_division_by_zero() {
    let mut r = Runtime::default();
    r.enter(r#"?1/0"#);
    assert_eq!(exec(&mut r), "?DIVISION BY ZERO\n");
    r.enter(r#"?1 MOD 0"#);
    assert_eq!(exec(&mut r), "?DIVISION BY ZERO\n");
}

#[test]
fn test_comparisons() {
    let mut r = Runtime::default();
    r.enter(r#"?1<2;1>2;2<=2;3<>3;"A"<"B";"A"="A""#);
    assert_eq!(exec(&mut r), "-1  0 -1  0 -1 -1 \n");
}

#[test]
fn test_logic() {
    let mut r = Runtime::default();
    r.enter(r#"?NOT 0;NOT -1;6 AND 3;6 OR 3;6 XOR 3"#);
    assert_eq!(exec(&mut r), "-1  0  2  7  5 \n");
    r.enter(r#"?NOT 1=2;1=1 AND 2=2"#);
    assert_eq!(exec(&mut r), "-1 -1 \n");
}

#[test]
fn test_strings() {
    let mut r = Runtime::default();
    r.enter(r#"?"AB"+"CD""#);
    assert_eq!(exec(&mut r), "ABCD\n");
    r.enter(r#"?"AB"-"CD""#);
    assert_eq!(exec(&mut r), "?TYPE MISMATCH\n");
    r.enter(r#"?"AB"+1"#);
    assert_eq!(exec(&mut r), "?TYPE MISMATCH\n");
    r.enter(r#"?-"AB""#);
    assert_eq!(exec(&mut r), "?TYPE MISMATCH\n");
}

#[test]
fn test_functions() {
    let mut r = Runtime::default();
    r.enter(r#"?ABS(-3);INT(-2.5);INT(2.5);SGN(-9);SGN(0);SQR(16)"#);
    assert_eq!(exec(&mut r), " 3 -3  2 -1  0  4 \n");
    r.enter(r#"?SQR(-1)"#);
    assert_eq!(exec(&mut r), "?INVALID PARAMETER\n");
    r.enter(r#"?ABS 1"#);
    assert_eq!(exec(&mut r), "?SYNTAX ERROR; EXPECTED LEFT PARENTHESIS\n");
}

#[test]
fn test_rnd() {
    let mut r = Runtime::default();
    r.enter(r#"?RND(0)"#);
    assert_eq!(exec(&mut r), " 0 \n");
    r.enter(r#"X=RND:?X>=0 AND X<1"#);
    assert_eq!(exec(&mut r), "-1 \n");
    r.enter(r#"RANDOMIZE 5:A=RND(1000):RANDOMIZE 5:?A=RND(1000)"#);
    assert_eq!(exec(&mut r), "-1 \n");
}

#[test]
fn test_missing_parts() {
    let mut r = Runtime::default();
    r.enter(r#"?(1+2"#);
    assert_eq!(exec(&mut r), "?EXPECTED RIGHT PARENTHESIS\n");
    r.enter(r#"A="#);
    assert_eq!(exec(&mut r), "?EXPECTED EXPRESSION\n");
    r.enter(r#"?1+"#);
    assert_eq!(exec(&mut r), "?EXPECTED EXPRESSION\n");
}

#[test]
fn test_overflow() {
    let mut r = Runtime::default();
    r.enter(r#"?10^400"#);
    assert_eq!(exec(&mut r), "?OVERFLOW\n");
    r.enter(r#"?1E10 AND 1"#);
    assert_eq!(exec(&mut r), "?OVERFLOW\n");
}
