mod common;
use common::*;
use nxbasic::mach::Runtime;

#[test]
fn test_for_loop_always_runs_once() {
    let mut r = Runtime::default();
    r.enter(r#"FOR I=3 TO 0:PRINT I:NEXT I"#);
    assert_eq!(exec(&mut r), " 3 \n");
}

#[test]
fn test_for_loop_step() {
    let mut r = Runtime::default();
    r.enter(r#"FOR I=10 TO 1 STEP -4:PRINT I;:NEXT:PRINT I"#);
    assert_eq!(exec(&mut r), " 10  6  2 -2 \n");
}

#[test]
fn test_nested_for() {
    let mut r = Runtime::default();
    enter_all(
        &mut r,
        &[
            "10 FOR Y=1 TO 2",
            "20 FOR X=8 TO 9",
            "30 PRINT Y;X",
            "40 NEXT X",
            "50 NEXT Y",
            "RUN",
        ],
    );
    assert_eq!(exec(&mut r), " 1  8 \n 1  9 \n 2  8 \n 2  9 \n");
}

#[test]
fn test_for_next_pairing() {
    let mut r = Runtime::default();
    enter_all(&mut r, &["10 FOR I=1 TO 2", "20 PRINT I", "RUN"]);
    assert_eq!(exec(&mut r), "?FOR WITHOUT NEXT IN 10\n");

    let mut r = Runtime::default();
    enter_all(&mut r, &["10 PRINT 1", "20 NEXT", "RUN"]);
    assert_eq!(exec(&mut r), "?NEXT WITHOUT FOR IN 20\n");

    let mut r = Runtime::default();
    enter_all(&mut r, &["10 FOR I=1 TO 2", "20 NEXT J", "RUN"]);
    assert_eq!(exec(&mut r), "?NEXT WITHOUT FOR IN 20\n");
}

#[test]
fn test_errors_stop_before_output() {
    let mut r = Runtime::default();
    enter_all(&mut r, &["10 PRINT \"NEVER\"", "20 A=1 B", "RUN"]);
    assert_eq!(exec(&mut r), "?EXPECTED END OF STATEMENT IN 20\n");
}

#[test]
fn test_print_separators() {
    let mut r = Runtime::default();
    r.enter(r#"PRINT "A";"B";:PRINT "C""#);
    assert_eq!(exec(&mut r), "ABC\n");
    r.enter(r#"PRINT "THE ANSWER!",2"#);
    assert_eq!(exec(&mut r), "THE ANSWER!    2 \n");
    r.enter(r#"PRINT"#);
    assert_eq!(exec(&mut r), "\n");
    r.enter(r#"PRINT 1,"#);
    assert_eq!(exec(&mut r), format!(" 1 {}", " ".repeat(11)));
}

#[test]
fn test_remark() {
    let mut r = Runtime::default();
    r.enter(r#"PRINT 1:REM PRINT 2"#);
    assert_eq!(exec(&mut r), " 1 \n");
    r.enter(r#"PRINT 3:' PRINT 4"#);
    assert_eq!(exec(&mut r), " 3 \n");
}

#[test]
fn test_end() {
    let mut r = Runtime::default();
    enter_all(&mut r, &["10 PRINT 1", "20 END", "30 PRINT 2", "RUN"]);
    assert_eq!(exec(&mut r), " 1 \n");
}

#[test]
fn test_run_clears_variables() {
    let mut r = Runtime::default();
    r.enter("10 PRINT A");
    r.enter("A=5");
    assert_eq!(exec(&mut r), "");
    r.enter("RUN");
    assert_eq!(exec(&mut r), " 0 \n");
}

#[test]
fn test_direct_mode_keeps_variables() {
    let mut r = Runtime::default();
    r.enter("A=5");
    exec(&mut r);
    r.enter("PRINT A");
    assert_eq!(exec(&mut r), " 5 \n");
}

#[test]
fn test_list_and_new() {
    let mut r = Runtime::default();
    enter_all(&mut r, &["20 END", "10 PRINT   \"HI\""]);
    r.enter("LIST");
    assert_eq!(exec(&mut r), "10 PRINT   \"HI\"\n20 END\n");
    r.enter("NEW");
    exec(&mut r);
    r.enter("LIST");
    assert_eq!(exec(&mut r), "\n");
}

#[test]
fn test_unknown_statement() {
    let mut r = Runtime::default();
    r.enter("TO 5");
    assert_eq!(exec(&mut r), "?SYNTAX ERROR; EXPECTED STATEMENT\n");
    r.enter("5");
    assert_eq!(exec(&mut r), "");
}

#[test]
fn test_interrupt() {
    let mut r = Runtime::default();
    enter_all(&mut r, &["10 FOR I=1 TO 2 STEP 0", "20 NEXT", "RUN"]);
    r.execute(3);
    assert!(r.is_running());
    r.interrupt();
    assert_eq!(exec(&mut r), "?BREAK IN 20\n");
    assert!(!r.is_running());
}

#[test]
fn test_cycles_exceeded() {
    let mut r = Runtime::default();
    r.enter("FOR I=1 TO 2 STEP 0:NEXT");
    assert_eq!(exec_n(&mut r, 10), "\n10 Execution cycles exceeded.\n");
}
