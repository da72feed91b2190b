use std::fmt::Write;
use crate::{ConflictError, ReduceReduceConflictError, ShiftReduceConflictError};

pub fn report(err: &ConflictError) -> String {
  match err {
    ConflictError::ReduceReduce(err) => report_rr_conflict(err),
    ConflictError::ShiftReduce(err) => report_sr_conflict(err),
  }
}

fn report_rr_conflict(
  err: &ReduceReduceConflictError
) -> String {
  let mut buf = String::new();

  writeln!(&mut buf,
    "reduce-reduce conflict at state {}:\n", err.state
  ).unwrap();

  for item in &err.state_items {
    writeln!(&mut buf,
      "  {}", item,
    ).unwrap();
  }

  writeln!(&mut buf,
    "\nwhich can be reduced by:\n\n  {}\n\nor:\n\n  {}\n\nwhen the lookahead is {}",
    err.reduce1,
    err.reduce2,
    err.lookahead,
  ).unwrap();

  buf
}

fn report_sr_conflict(
  err: &ShiftReduceConflictError
) -> String {
  let mut buf = String::new();

  writeln!(&mut buf,
    "shift-reduce conflict at state {}:\n", err.state
  ).unwrap();

  for item in &err.state_items {
    writeln!(&mut buf,
      "  {}", item,
    ).unwrap();
  }

  writeln!(&mut buf,
    "\nwhich can shift {}\nor reduce by:\n\n  {}",
    err.shift,
    err.reduce,
  ).unwrap();

  buf
}
