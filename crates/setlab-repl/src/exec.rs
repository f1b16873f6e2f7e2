use std::fs::File;
use std::io::{BufReader, prelude::*};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use itertools::Itertools;
use lazy_regex::{regex, regex_captures};
use tracing::warn;

use setlab::algebra::SetOp;
use setlab::store::Store;
use setlab::visual::VennRegions;
use setlab::{Command, Definition, Element, Outcome, Session};
use setlab_plot::{ChartOptions, VennOptions, draw_cardinality_chart, draw_venn};
use setlab_utils::{braced, latin_digits, persian_digits};

pub struct ExecContext {
    pub is_repl: bool,
    pub debug_mode: bool,
    pub persian_digits: bool,
    pub open_plots: bool,
    pub plot_dir: PathBuf,
}

impl Default for ExecContext {
    fn default() -> Self {
        Self {
            is_repl: false,
            debug_mode: false,
            persian_digits: false,
            open_plots: true,
            plot_dir: PathBuf::from("."),
        }
    }
}

impl ExecContext {
    fn show(&self, elements: &[Element]) -> String {
        let shown = braced(elements);
        if self.persian_digits {
            persian_digits(&shown)
        } else {
            shown
        }
    }
}

pub fn exec_file<S: Store>(
    path: &Path,
    exec_ctx: &mut ExecContext,
    session: &mut Session<S>,
) -> std::io::Result<()> {
    let file = File::open(path)?;
    exec_reader(BufReader::new(file), exec_ctx, session)
}

fn exec_reader<S: Store>(
    reader: impl BufRead,
    exec_ctx: &mut ExecContext,
    session: &mut Session<S>,
) -> std::io::Result<()> {
    for res in reader.lines() {
        let line = res?;
        if let Some(string) = line.strip_prefix("!") {
            println!("{}", string.trim());
            continue;
        }

        if exec_line(&line, exec_ctx, session).is_some() {
            break;
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
pub enum ExecResult {
    Exit,
    Error,
}

/// Reads one statement of set notation into a command, or `None` if the line means nothing.
pub fn parse_statement(line: &str) -> Option<Command> {
    let line = line.trim();

    let define = |name: &str, definition| Command::Define {
        name: name.to_owned(),
        definition,
    };
    if let Some((_, name, text)) = regex_captures!(r"^([^=:~{∈⊆⊂]+?)\s*:=\s*(.*)$", line) {
        return Some(define(name, Definition::Predicate(text.to_owned())));
    }
    if let Some((_, name, text)) = regex_captures!(r"^([^=:~{∈⊆⊂]+?)\s*~=\s*(.*)$", line) {
        return Some(define(name, Definition::Verbal(text.to_owned())));
    }
    if let Some((_, name, text)) = regex_captures!(r"^([^=:~{∈⊆⊂]+?)\s*=\s*(.*)$", line) {
        return Some(define(name, Definition::Literal(text.to_owned())));
    }

    if let Some((_, candidate, set)) = regex_captures!(r"^(.+?)\s*∈\s*(\S+)$", line) {
        return Some(Command::Member {
            candidate: candidate.to_owned(),
            set: set.to_owned(),
        });
    }
    if let Some((_, left, right)) = regex_captures!(r"^(\S+?)\s*[⊆⊂]\s*(\S+)$", line) {
        return Some(Command::Subset {
            left: left.to_owned(),
            right: right.to_owned(),
        });
    }

    let (left, op, right) = regex_captures!(
        r"^(\S+)\s+(union|inter|intersection|diff|difference)\s+(\S+)$",
        line
    )
    .or_else(|| regex_captures!(r"^(\S+?)\s*([∪∩−\\-])\s*(\S+)$", line))
    .map(|(_, left, op, right)| (left, op, right))?;

    Some(Command::Operate {
        op: SetOp::from_str(op).ok()?,
        left: left.to_owned(),
        right: right.to_owned(),
    })
}

pub fn exec_line<S: Store>(
    mut line: &str,
    exec_ctx: &mut ExecContext,
    session: &mut Session<S>,
) -> Option<ExecResult> {
    if line.trim().is_empty() {
        return None;
    }

    if let Some(remainder) = line.trim_start().strip_prefix(":") {
        return eval_command(remainder, exec_ctx, session);
    }

    // a comment starts at a `#` that begins a word, so `{a#b}` keeps its token
    if let Some(comment) = regex!(r"(?:^|\s)#").find(line) {
        line = &line[..comment.start()];
        if line.trim().is_empty() {
            return None;
        }
    }

    let normalized;
    let line = if exec_ctx.persian_digits {
        normalized = latin_digits(line);
        normalized.as_str()
    } else {
        line
    };

    let Some(command) = parse_statement(line) else {
        println!("Could not understand: {}", line.trim());
        return Some(ExecResult::Error);
    };
    run(command, exec_ctx, session)
}

fn run<S: Store>(
    command: Command,
    exec_ctx: &ExecContext,
    session: &mut Session<S>,
) -> Option<ExecResult> {
    if exec_ctx.debug_mode {
        println!("Command: {command:?}");
    }

    match session.dispatch(command.clone()) {
        Ok(outcome) => {
            render(&command, outcome, exec_ctx);
            None
        }
        Err(error) => {
            println!("Error: {error}");
            Some(ExecResult::Error)
        }
    }
}

fn render(command: &Command, outcome: Outcome, exec_ctx: &ExecContext) {
    match outcome {
        Outcome::Started => println!("Started over with no sets"),
        Outcome::Defined { name, record } | Outcome::Imported { name, record } => {
            println!("{name} = {}", exec_ctx.show(&record.elements));
            if exec_ctx.is_repl && !record.source_text.is_empty() {
                println!("\x1b[90m{} from {}\x1b[0m", record.kind, record.source_text);
            }
        }
        Outcome::Deleted { name } => println!("Deleted {name}"),
        Outcome::Undone { restored: true } => println!("Undone"),
        Outcome::Undone { restored: false } => println!("Nothing to undo"),
        Outcome::Operation { op, elements } => {
            if let Command::Operate { left, right, .. } = command {
                print!("{left} {} {right} = ", op.symbol());
            }
            println!("{}", exec_ctx.show(&elements));
        }
        Outcome::Membership {
            candidate,
            is_member,
        } => {
            let relation = if is_member { '∈' } else { '∉' };
            match command {
                Command::Member { set, .. } => println!("{candidate} {relation} {set}"),
                _ => println!("{candidate} {relation}"),
            }
        }
        Outcome::Subset(relation) => {
            if let Command::Subset { left, right } = command {
                println!("{left} {} {right}", relation.inclusion.symbol());
                println!(
                    "|{left}| = {}, |{right}| = {}",
                    relation.left_count, relation.right_count
                );
            }
        }
        Outcome::Venn(regions) => {
            if let Command::Venn { left, right } = command {
                render_venn(left, right, &regions, exec_ctx);
            }
        }
        Outcome::Chart(bars) => {
            if bars.is_empty() {
                println!("No sets defined");
                return;
            }
            for bar in &bars {
                println!(
                    "{: <6} {} {}",
                    bar.name,
                    "█".repeat(bar.cardinality.min(40)),
                    bar.cardinality
                );
            }
            let path = exec_ctx.plot_dir.join("cardinality.svg");
            let res = draw_cardinality_chart(&path, &bars, &ChartOptions::default());
            finish_plot(&path, res, exec_ctx);
        }
        Outcome::Listing(sets) => {
            if sets.is_empty() {
                println!("No sets defined");
            }
            for (name, record) in sets {
                println!(
                    "   {name: <6}=   {}   \x1b[90m{}\x1b[0m",
                    exec_ctx.show(&record.elements),
                    record.kind
                );
            }
        }
        Outcome::Templates(templates) => {
            for (universe, elements) in templates {
                println!(
                    "   {universe: <3} {: <18} {}",
                    universe.description(),
                    exec_ctx.show(&elements)
                );
            }
        }
    }
}

fn render_venn(left: &str, right: &str, regions: &VennRegions, exec_ctx: &ExecContext) {
    println!("only {left}: {}", exec_ctx.show(&regions.only_left));
    println!("{left} ∩ {right}: {}", exec_ctx.show(&regions.both));
    println!("only {right}: {}", exec_ctx.show(&regions.only_right));

    let path = exec_ctx.plot_dir.join("venn.svg");
    let opts = VennOptions {
        left_name: left.to_owned(),
        right_name: right.to_owned(),
        ..VennOptions::default()
    };
    let res = draw_venn(&path, regions, &opts);
    finish_plot(&path, res, exec_ctx);
}

fn finish_plot(path: &Path, res: Result<(), Box<dyn std::error::Error>>, exec_ctx: &ExecContext) {
    if let Err(err) = res {
        warn!(%err, path = %path.display(), "drawing failed");
        println!("Could not draw {}", path.display());
        return;
    }
    if exec_ctx.open_plots && exec_ctx.is_repl {
        if let Err(err) = open::that(path) {
            warn!(%err, "cannot open viewer");
        }
    } else {
        println!("Saved {}", path.display());
    }
}

fn eval_command<S: Store>(
    command: &str,
    exec_ctx: &mut ExecContext,
    session: &mut Session<S>,
) -> Option<ExecResult> {
    let kind = command.chars().next()?;
    let args = command[kind.len_utf8()..].split_whitespace().collect_vec();

    let set_command = match (kind, &args[..]) {
        ('q', _) => return Some(ExecResult::Exit),
        ('h', []) => {
            print_help("");
            return None;
        }
        ('h', topics) => {
            for topic in topics {
                print_help(topic);
            }
            return None;
        }
        ('s', settings) => {
            update_settings(settings, exec_ctx);
            return None;
        }
        ('e', [name, ..]) => {
            let path = Path::new(name);
            if let Err(err) = exec_file(path, exec_ctx, session) {
                println!("Cannot run {name}: {err}");
                return Some(ExecResult::Error);
            }
            return None;
        }
        ('l', _) => Command::List,
        ('t', _) => Command::Templates,
        ('c', _) => Command::Cardinality,
        ('u', _) => Command::Undo,
        ('n', _) => Command::Start,
        ('i', [template]) => Command::ImportTemplate((*template).to_owned()),
        ('d', [name]) => Command::Delete((*name).to_owned()),
        ('v', [left, right]) => Command::Venn {
            left: (*left).to_owned(),
            right: (*right).to_owned(),
        },
        ('e' | 'i' | 'd' | 'v', _) => {
            println!("Wrong number of arguments for :{kind}, see :h commands");
            return Some(ExecResult::Error);
        }
        _ => {
            println!("Unknown command type {kind}. Ignoring");
            return None;
        }
    };
    run(set_command, exec_ctx, session)
}

fn update_settings(args: &[&str], exec_ctx: &mut ExecContext) {
    for arg in args {
        match *arg {
            "debug" => exec_ctx.debug_mode = true,
            "normal" => exec_ctx.debug_mode = false,
            "persian" => exec_ctx.persian_digits = true,
            "latin" => exec_ctx.persian_digits = false,
            "open" => exec_ctx.open_plots = true,
            "noopen" => exec_ctx.open_plots = false,
            _ => println!("Unknown setting {arg}"),
        }
    }
}

fn print_help(topic: &str) {
    match topic {
        "" => println!(
            "SetLab, a small laboratory for finite sets

Define sets, combine them and ask questions about them.
Every change is saved, and :u takes it back.
For the notation, type :h syntax. For a list of commands, type :h commands"
        ),
        "syntax" => println!(
            "A = {{1, 2, 3}}                 enumerated set
A := {{ x | x ∈ ℕ , x ≤ 3 }}     set-builder notation
A ~= odd numbers from 1 to 10   described in words (English or Persian)
A ∪ B   A ∩ B   A − B           union, intersection, difference
A union B   A inter B   A diff B
3 ∈ A                           membership
A ⊆ B                           inclusion"
        ),
        "commands" => println!(
            ":l            list sets
:t            list the universal templates
:i ℕ          import a template as a set
:d A          delete a set
:u            undo the last change
:v A B        Venn diagram of two sets
:c            cardinality chart
:n            start over with no sets
:s setting    debug/normal, persian/latin, open/noopen
:e file       run a script
:h topic      help
:q            quit"
        ),
        _ => println!("No help for {topic}"),
    }
}

#[cfg(test)]
mod tests {
    use setlab::store::MemoryStore;

    use super::*;

    fn quiet() -> ExecContext {
        ExecContext {
            open_plots: false,
            ..ExecContext::default()
        }
    }

    #[test]
    fn definitions() {
        assert_eq!(
            parse_statement("A = {1, 2, 3}"),
            Some(Command::Define {
                name: "A".to_owned(),
                definition: Definition::Literal("{1, 2, 3}".to_owned()),
            })
        );
        assert_eq!(
            parse_statement("Evens := { x | x ∈ ℕ , x % 2 = 0 }"),
            Some(Command::Define {
                name: "Evens".to_owned(),
                definition: Definition::Predicate("{ x | x ∈ ℕ , x % 2 = 0 }".to_owned()),
            })
        );
        assert_eq!(
            parse_statement("P ~= prime numbers up to 20"),
            Some(Command::Define {
                name: "P".to_owned(),
                definition: Definition::Verbal("prime numbers up to 20".to_owned()),
            })
        );
    }

    #[test]
    fn blank_definition_still_reaches_session() {
        assert_eq!(
            parse_statement("A ="),
            Some(Command::Define {
                name: "A".to_owned(),
                definition: Definition::Literal(String::new()),
            })
        );
    }

    #[test]
    fn operations() {
        let operate = |op, left: &str, right: &str| {
            Some(Command::Operate {
                op,
                left: left.to_owned(),
                right: right.to_owned(),
            })
        };
        assert_eq!(parse_statement("A ∪ B"), operate(SetOp::Union, "A", "B"));
        assert_eq!(
            parse_statement("A∩B"),
            operate(SetOp::Intersection, "A", "B"),
        );
        assert_eq!(
            parse_statement("A - B"),
            operate(SetOp::Difference, "A", "B"),
        );
        assert_eq!(
            parse_statement("A − B"),
            operate(SetOp::Difference, "A", "B"),
        );
        assert_eq!(
            parse_statement("A inter B"),
            operate(SetOp::Intersection, "A", "B"),
        );
        assert_eq!(
            parse_statement("A diff B"),
            operate(SetOp::Difference, "A", "B"),
        );
    }

    #[test]
    fn queries() {
        assert_eq!(
            parse_statement("2.5 ∈ A"),
            Some(Command::Member {
                candidate: "2.5".to_owned(),
                set: "A".to_owned(),
            })
        );
        assert_eq!(
            parse_statement("A ⊆ B"),
            Some(Command::Subset {
                left: "A".to_owned(),
                right: "B".to_owned(),
            })
        );
    }

    #[test]
    fn nonsense_is_not_a_command() {
        assert_eq!(parse_statement("hello there world"), None);
        assert_eq!(parse_statement("A ⊕ B"), None);
    }

    #[test]
    fn lines_drive_the_session() {
        let mut session = Session::open(MemoryStore::new());
        let mut ctx = quiet();

        assert_eq!(
            exec_line("A = {1, 2, 3} # first", &mut ctx, &mut session),
            None,
        );
        assert_eq!(exec_line("B = {3, 4}", &mut ctx, &mut session), None);
        assert_eq!(exec_line("C = {5}", &mut ctx, &mut session), None);
        assert_eq!(session.registry().len(), 3);

        assert_eq!(
            exec_line("A = {9}", &mut ctx, &mut session),
            Some(ExecResult::Error)
        );
        assert_eq!(exec_line(":d C", &mut ctx, &mut session), None);
        assert_eq!(session.registry().len(), 2);
        assert_eq!(exec_line(":u", &mut ctx, &mut session), None);
        assert_eq!(session.registry().len(), 3);
        assert_eq!(
            exec_line(":q", &mut ctx, &mut session),
            Some(ExecResult::Exit),
        );
    }

    #[test]
    fn hash_inside_a_token_is_not_a_comment() {
        let mut session = Session::open(MemoryStore::new());
        let mut ctx = quiet();

        assert_eq!(
            exec_line("A = {a#b, 2} #tokens", &mut ctx, &mut session),
            None,
        );
        assert_eq!(
            session.registry().elements("A").map(<[Element]>::to_vec),
            Ok(vec![Element::from(2), Element::text("a#b")])
        );
        assert_eq!(exec_line("# only a comment", &mut ctx, &mut session), None);
        assert_eq!(session.registry().len(), 1);
    }

    #[test]
    fn persian_digits_are_read_when_enabled() {
        let mut session = Session::open(MemoryStore::new());
        let mut ctx = quiet();

        assert_eq!(exec_line(":s persian", &mut ctx, &mut session), None);
        assert!(ctx.persian_digits);
        assert_eq!(exec_line("A = {۱, ۲}", &mut ctx, &mut session), None);
        assert_eq!(
            session.registry().elements("A").map(<[Element]>::to_vec),
            Ok(vec![Element::from(1), Element::from(2)])
        );
    }

    #[test]
    fn scripts_stop_at_the_first_error() {
        let mut session = Session::open(MemoryStore::new());
        let script = "! defining\nA = {1}\nnonsense here now\nB = {2}\n";

        exec_reader(script.as_bytes(), &mut quiet(), &mut session)
            .unwrap();
        assert!(session.registry().contains("A"));
        assert!(!session.registry().contains("B"));
    }

    #[test]
    fn colon_commands_check_arguments() {
        let mut session = Session::open(MemoryStore::new());
        let mut ctx = quiet();

        assert_eq!(
            exec_line(":d", &mut ctx, &mut session),
            Some(ExecResult::Error),
        );
        assert_eq!(exec_line(":i ℕ", &mut ctx, &mut session), None);
        assert!(session.registry().contains("ℕ"));
        assert_eq!(
            exec_line(":i X", &mut ctx, &mut session),
            Some(ExecResult::Error),
        );
    }
}
