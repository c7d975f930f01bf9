//! Best-effort human-readable process names.

const INTERPRETERS: [&str; 9] = [
    "node", "python", "python3", "ruby", "java", "perl", "php", "tcl", "wish",
];

// How many arguments after argv[0] are searched for a script name.
const SCRIPT_SEARCH_DEPTH: usize = 3;

pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn is_interpreter(name: &str) -> bool {
    INTERPRETERS
        .iter()
        .any(|interp| interp.eq_ignore_ascii_case(name))
}

/// Name from argv: basename of argv[0], extended with the script name when
/// argv[0] is a known interpreter.
pub fn name_from_args(args: &[String]) -> Option<String> {
    let program = basename(args.first()?);
    if program.is_empty() {
        return None;
    }
    if !is_interpreter(program) || args.len() < 2 {
        return Some(program.to_string());
    }

    let script = args
        .iter()
        .skip(1)
        .take(SCRIPT_SEARCH_DEPTH)
        .find(|arg| !arg.is_empty() && !arg.starts_with('-'))
        .map(|arg| basename(arg))
        .filter(|name| !name.is_empty());

    match script {
        Some(script) => Some(format!("{program} {script}")),
        None => Some(program.to_string()),
    }
}

/// Resolve a display name: argv first, then the executable path, then a
/// `Process <pid>` placeholder.
pub fn resolve_display_name(
    pid: i32,
    args: Option<&[String]>,
    executable_path: Option<&str>,
) -> String {
    args.and_then(name_from_args)
        .or_else(|| {
            executable_path
                .map(basename)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("Process {pid}"))
}
