// tests/command_spec.rs

use apprelay::command::CommandSpec;

#[test]
fn quoted_path_is_split_at_closing_quote() {
    let spec = CommandSpec::parse(r#""C:\Program Files\App\app.exe" -x  y "#);
    assert_eq!(spec.executable_path, r"C:\Program Files\App\app.exe");
    assert_eq!(spec.arguments, "-x  y");
}

#[test]
fn unquoted_path_is_split_at_first_space() {
    let spec = CommandSpec::parse("  notepad.exe   readme.txt other ");
    assert_eq!(spec, CommandSpec::new("notepad.exe", "readme.txt other"));
}

#[test]
fn no_space_means_no_arguments() {
    let spec = CommandSpec::parse(r"C:\tools\a.exe");
    assert_eq!(spec, CommandSpec::new(r"C:\tools\a.exe", ""));
    assert!(!spec.has_arguments());
}

#[test]
fn unterminated_quote_keeps_whole_string() {
    let spec = CommandSpec::parse(r#""C:\Program Files\a.exe -x"#);
    assert_eq!(spec.executable_path, r#""C:\Program Files\a.exe -x"#);
    assert_eq!(spec.arguments, "");
}

#[test]
fn quoted_path_without_arguments() {
    let spec = CommandSpec::parse(r#""/opt/My App/run""#);
    assert_eq!(spec, CommandSpec::new("/opt/My App/run", ""));
}

#[test]
fn empty_input_gives_empty_path() {
    assert_eq!(CommandSpec::parse("   "), CommandSpec::default());
}

#[test]
fn file_name_accepts_both_separators() {
    assert_eq!(CommandSpec::parse(r"C:\Games\Launcher.exe").file_name(), "Launcher.exe");
    assert_eq!(CommandSpec::parse("/usr/bin/env FOO=1").file_name(), "env");
    assert_eq!(CommandSpec::parse("tool").file_name(), "tool");
}

#[test]
fn display_requotes_paths_with_spaces() {
    let spec = CommandSpec::new(r"C:\Program Files\a.exe", "-x");
    assert_eq!(spec.to_string(), r#""C:\Program Files\a.exe" -x"#);
    assert_eq!(CommandSpec::parse(&spec.to_string()), spec);

    assert_eq!(CommandSpec::new("a.exe", "").to_string(), "a.exe");
}
