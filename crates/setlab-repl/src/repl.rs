use std::borrow::Cow::{self, Borrowed, Owned};
use std::fs;
use std::path::Path;

use itertools::Itertools;
use lazy_regex::regex_find;
use strum::IntoEnumIterator;
use tracing::warn;

use rustyline::completion::{Completer, Pair};
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter, MatchingBracketHighlighter};
use rustyline::validate::MatchingBracketValidator;
use rustyline::{Completer, Helper, Hinter, Validator};
use rustyline::{CompletionType, Config, Editor};

use setlab::Session;
use setlab::algebra::SetOp;
use setlab::sets::Universe;
use setlab::store::Store;

use crate::exec::{ExecContext, ExecResult, exec_line};

/// Words that complete to the symbol they stand for.
const SYMBOL_WORDS: [(&str, &str); 5] = [
    ("in", "∈"),
    ("subset", "⊆"),
    ("empty", "∅"),
    ("leq", "≤"),
    ("geq", "≥"),
];

#[derive(Helper, Completer, Hinter, Validator)]
struct ReplHelper {
    #[rustyline(Completer)]
    completer: SymbolCompleter,
    highlighter: MatchingBracketHighlighter,
    #[rustyline(Validator)]
    validator: MatchingBracketValidator,
    colored_prompt: String,
}

struct SymbolCompleter {}

impl SymbolCompleter {
    fn candidates(partial: &str) -> Vec<Pair> {
        let ops = SetOp::iter().map(|op| (op.to_string(), op.symbol().to_string()));
        let universes = Universe::iter().map(|universe| {
            (
                universe.description().to_lowercase(),
                universe.to_string(),
            )
        });
        let words = SYMBOL_WORDS
            .iter()
            .map(|(word, symbol)| ((*word).to_owned(), (*symbol).to_owned()));

        ops.chain(words)
            .chain(universes)
            .filter(|(word, _)| word.starts_with(partial))
            .map(|(word, symbol)| Pair {
                display: format!("{word} {symbol}"),
                replacement: symbol,
            })
            .collect_vec()
    }
}

impl Completer for SymbolCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        if pos != line.len() {
            return Ok((0, Vec::with_capacity(0)));
        }
        match regex_find!(r"[a-z]+$", line) {
            Some(partial) => Ok((pos - partial.len(), Self::candidates(partial))),
            None => Ok((0, Vec::with_capacity(0))),
        }
    }
}

impl Highlighter for ReplHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Borrowed(&self.colored_prompt)
        } else {
            Borrowed(prompt)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned("\x1b[1m".to_owned() + hint + "\x1b[m")
    }

    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_char(&self, line: &str, pos: usize, kind: CmdKind) -> bool {
        self.highlighter.highlight_char(line, pos, kind)
    }
}

pub fn repl<S: Store>(session: &mut Session<S>, history_path: &Path) -> rustyline::Result<()> {
    println!("\nStarting SetLab... type :h for help");

    let prompt = "set> ";

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();
    let helper = ReplHelper {
        completer: SymbolCompleter {},
        highlighter: MatchingBracketHighlighter::new(),
        colored_prompt: format!("\x1b[1;36m{prompt}\x1b[0m"),
        validator: MatchingBracketValidator::new(),
    };

    let mut editor = Editor::with_config(config)?;
    editor.set_helper(Some(helper));
    editor.set_auto_add_history(true);

    if let Some(parent) = history_path.parent()
        && let Err(err) = fs::create_dir_all(parent)
    {
        warn!(%err, path = %parent.display(), "cannot create history directory");
    }
    if editor.load_history(history_path).is_err() {
        println!("No history file found, starting a fresh one\n");
    }

    let mut exec_ctx = ExecContext {
        is_repl: true,
        ..Default::default()
    };

    loop {
        println!();
        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(err) => {
                println!("Encountered error while reading input: {err}");
                continue;
            }
        };

        if let Err(err) = editor.save_history(history_path) {
            warn!(%err, "cannot save line history");
        }

        if let Some(ExecResult::Exit) = exec_line(&line, &mut exec_ctx, session) {
            println!("Exiting...");
            break;
        }
    }
    Ok(())
}
