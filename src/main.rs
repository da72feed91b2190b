use std::env;
use std::fs;
use std::process;
use anyhow::Context;
use getopts::Options;
use grammar::NameGen;
use lr::ParserKind;
use lr::lex::Words;

fn main() -> anyhow::Result<()> {
  env_logger::init();

  let args = env::args().collect::<Vec<_>>();
  let prog = args[0].clone();
  let mut opts = Options::new();
  opts.optopt("t", "type",
    "Type of parser table. Defaults to LALR.\n\
      Supported types: SLR, LALR, LR (case insensitive)",
    "TYPE");
  opts.optopt("i", "input",
    "Tokens to parse, separated by whitespace. A token is a terminal\n\
      name or TERMINAL:TEXT, and the input must end with $",
    "TOKENS");
  opts.optflag("", "dump", "Print the parse table");
  opts.optflag("", "left-factor", "Left factor the grammar before building");
  opts.optflag("h", "help", "Print this message");

  let matches = match opts.parse(&args[1..]) {
    Ok(m) => m,
    Err(err) => {
      eprintln!("{}", err);
      process::exit(1);
    }
  };

  if matches.opt_present("h") {
    print_usage(prog, opts);
    return Ok(());
  }

  let kind = match matches.opt_str("t") {
    Some(ty) => ty.parse::<ParserKind>()?,
    None => ParserKind::Lalr,
  };

  let path = if matches.free.len() == 1 {
    matches.free[0].clone()
  } else {
    print_usage(prog, opts);
    process::exit(1);
  };

  let text = fs::read_to_string(&path)
    .with_context(|| format!("cannot read grammar file {}", path))?;

  let mut names = NameGen::default();
  let grammar = grammar::build_with(&text, &names)
    .with_context(|| format!("invalid grammar in {}", path))?;
  let grammar = if matches.opt_present("left-factor") {
    grammar.left_factored(&mut names)?.into_owned()
  } else {
    grammar
  };

  let table = lr::build(&grammar, kind);
  log::info!("{} table for {}: {} states, {} conflicts",
    kind, path, table.num_states(), table.conflicts().len());

  if matches.opt_present("dump") {
    print!("{}", table);
  }

  if !table.is_valid() {
    for conflict in table.conflicts() {
      eprintln!("{}", lr::report::report(conflict));
    }
    eprintln!("the grammar is not {}", kind);
    process::exit(1);
  }

  if let Some(input) = matches.opt_str("i") {
    match table.parse(Words::new(&table, &input)) {
      Ok(tree) => println!("{}", tree.display(&table)),
      Err(err) => {
        eprintln!("{}", err);
        process::exit(1);
      }
    }
  }

  Ok(())
}

fn print_usage(prog: String, opts: Options) {
  let brief = format!("Usage: {} [options] GRAMMAR_FILE", prog);
  print!("{}", opts.usage(&brief));
}
