use super::*;
use test_case::test_case;

fn lines(target: &mut StringOutputTarget) {
    target.output_line("class A {");
    indented(target, |target| {
        target.output_line("var a: Int");
        target.output_line("");
        indented(target, |target| target.output_line("nested"));
    });
    target.output_line("}");
}

#[test]
fn indentation_is_scoped_to_the_guard() {
    let mut target = StringOutputTarget::new("    ");

    lines(&mut target);

    assert_eq!(
        target.as_str(),
        "class A {\n    var a: Int\n\n        nested\n}\n"
    );
    assert_eq!(target.indent_level(), 0);
}

#[test]
fn indentation_is_restored_after_early_return() {
    fn emit(target: &mut StringOutputTarget) -> Result<(), String> {
        indented(target, |target| {
            target.output_line("before");
            Err::<(), _>("stop".to_string())?;
            target.output_line("unreachable");
            Ok(())
        })
    }

    let mut target = StringOutputTarget::new("  ");
    let result = emit(&mut target);
    target.output_line("after");

    assert_eq!(result, Err("stop".to_string()));
    assert_eq!(target.as_str(), "  before\nafter\n");
}

#[test]
fn indentation_is_restored_after_panic() {
    let mut target = StringOutputTarget::new("  ");

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        indented(&mut target, |_| panic!("boom"));
    }));

    assert!(outcome.is_err());
    assert_eq!(target.indent_level(), 0);
}

#[test]
fn guard_derefs_to_its_target() {
    let mut target = StringOutputTarget::new("\t");
    {
        let mut guard = IndentGuard::new(&mut target);
        guard.output_line("inside");
        assert_eq!(guard.indent_level(), 1);
    }
    target.output_line("outside");

    assert_eq!(target.build(), "\tinside\noutside\n");
}

#[test]
fn dedent_never_goes_below_zero() {
    let mut target = StringOutputTarget::new("    ");
    target.decrease_indent();
    target.output_line("x");

    assert_eq!(target.as_str(), "x\n");
    assert!(!target.is_empty());
}

#[test_case("    " ; "spaces")]
#[test_case("\t" ; "tab")]
fn memory_output_uses_configured_indent(indent: &str) {
    let mut output = MemoryWriterOutput::new(indent);
    {
        let mut target = output
            .create_file("A.swift")
            .expect("memory target should be created");
        target.output_line("{");
        indented(&mut *target, |target| target.output_line("body"));
        target.output_line("}");
        target.finish().expect("memory target should finish");
    }

    assert_eq!(
        output.file("A.swift"),
        Some(format!("{{\n{}body\n}}\n", indent).as_str())
    );
}

#[test]
fn memory_output_keeps_files_in_creation_order() {
    let mut output = MemoryWriterOutput::new("    ");
    for path in ["B.swift", "A.swift"] {
        let mut target = output
            .create_file(path)
            .expect("memory target should be created");
        target.output_line(path);
        target.finish().expect("memory target should finish");
    }

    let paths: Vec<&str> = output.files().keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["B.swift", "A.swift"]);
}

#[test]
fn unfinished_memory_target_is_discarded() {
    let mut output = MemoryWriterOutput::new("    ");
    {
        let mut target = output
            .create_file("A.swift")
            .expect("memory target should be created");
        target.output_line("lost");
    }

    assert!(output.file("A.swift").is_none());
}

#[test]
fn disk_output_creates_parent_directories() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let mut output = DiskWriterOutput::new(dir.path(), "    ");

    let mut target = output
        .create_file("nested/dir/A.swift")
        .expect("disk target should be created");
    target.output_line("class A {");
    target.output_line("}");
    target.finish().expect("disk target should be written");

    let written = std::fs::read_to_string(dir.path().join("nested/dir/A.swift"))
        .expect("written file should be readable");
    assert_eq!(written, "class A {\n}\n");
}

#[test]
fn disk_output_reports_the_failing_path() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").expect("blocker file should be created");
    let mut output = DiskWriterOutput::new(&blocker, "    ");

    let target = output
        .create_file("A.swift")
        .expect("disk target should be created");
    match target.finish() {
        Err(WriterError::Io { path, .. }) => assert_eq!(path, blocker),
        other => panic!("Expected I/O error, got {:?}", other),
    }
}
