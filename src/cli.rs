/// What the argument list asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run,
    Help,
    Invalid(Vec<String>),
}

pub const HELP: &[&str] = &[
    "[W A S D] - moving",
    "[P] - clear",
    "[Space] - revive or kill cell",
    "[Enter] - start or stop simulation",
    "[Ctrl+C] - quit",
];

/// Classifies the arguments that follow the program name.
pub fn parse<I, S>(args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    match args.as_slice() {
        [] => Command::Run,
        [one] if one == "--help" || one == "-h" => Command::Help,
        _ => Command::Invalid(args),
    }
}

pub fn help_text() -> String {
    let mut s = HELP.join("\n");
    s.push('\n');
    s
}

pub fn invalid_text(args: &[String]) -> String {
    format!("\"{}\" is not a correct argument\n", args.join(" "))
}
