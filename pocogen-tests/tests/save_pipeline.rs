//! Save pipeline behavior against real directories

use std::fs;

use pocogen::{Error, OutputContext};

fn context(files: &[(&str, &str)]) -> OutputContext {
    let mut context = OutputContext::new();
    for (key, line) in files {
        context.get_or_create(key).write_line(*line);
    }
    context
}

#[test]
fn save_writes_every_buffer_and_overwrites() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("Models");
    fs::create_dir_all(&root)?;
    fs::write(root.join("Person.cs"), "stale content that is longer than the new one\n")?;

    let report = context(&[("Person.cs", "class Person {}"), ("Sales/Order.cs", "class Order {}")])
        .save(&root)?;

    assert_eq!(report.written.len(), 2);
    assert_eq!(fs::read_to_string(root.join("Person.cs"))?, "class Person {}\n");
    assert_eq!(
        fs::read_to_string(root.join("Sales").join("Order.cs"))?,
        "class Order {}\n"
    );
    Ok(())
}

#[test]
fn keys_may_navigate_above_the_root() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("out").join("Models");

    context(&[("..\\Shared.cs", "shared"), ("./Nested/../Local.cs", "local")]).save(&root)?;

    assert_eq!(fs::read_to_string(dir.path().join("out").join("Shared.cs"))?, "shared\n");
    assert_eq!(fs::read_to_string(root.join("Local.cs"))?, "local\n");
    Ok(())
}

#[test]
fn colliding_keys_write_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("Models");

    let err = context(&[("A.cs", "a"), ("B.cs", "b"), ("./A.cs", "again")])
        .save(&root)
        .unwrap_err();

    match err {
        Error::DestinationCollision { key, existing, path } => {
            assert_eq!(key, "./A.cs");
            assert_eq!(existing, "A.cs");
            assert!(path.ends_with("A.cs"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!root.exists());
    Ok(())
}

#[test]
fn file_key_shadowing_a_directory_writes_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("Models");

    let err = context(&[("Sales", "not a directory"), ("Sales/Order.cs", "class Order {}")])
        .save(&root)
        .unwrap_err();

    match err {
        Error::DestinationCollision { key, existing, path } => {
            assert_eq!(key, "Sales/Order.cs");
            assert_eq!(existing, "Sales");
            assert!(path.ends_with("Models/Sales"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!root.join("Sales").join("Order.cs").exists());
    assert!(!root.exists());
    Ok(())
}

#[test]
fn staging_failures_are_collected_and_nothing_is_promoted() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().to_path_buf();
    fs::write(root.join("blocker"), "a file where a directory is needed")?;

    let err = context(&[
        ("Good.cs", "good"),
        ("blocker/First.cs", "first"),
        ("blocker/Second.cs", "second"),
    ])
    .save(&root)
    .unwrap_err();

    let failures = match err {
        Error::Persistence(failures) => failures,
        other => panic!("expected a persistence error, got {other}"),
    };
    let keys: Vec<&str> = failures.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, vec!["blocker/First.cs", "blocker/Second.cs"]);
    assert!(failures.to_string().starts_with("Failed to persist 2 file(s):"));

    assert!(!root.join("Good.cs").exists());
    // no staging leftovers next to the destinations
    assert_eq!(fs::read_dir(&root)?.count(), 1);
    Ok(())
}

#[test]
fn promotion_failures_are_collected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().to_path_buf();
    fs::create_dir(root.join("Taken.cs"))?;
    fs::write(root.join("Taken.cs").join("keep"), "")?;

    let err = context(&[("Fine.cs", "fine"), ("Taken.cs", "taken")])
        .save(&root)
        .unwrap_err();

    let failures = match err {
        Error::Persistence(failures) => failures,
        other => panic!("expected a persistence error, got {other}"),
    };
    assert_eq!(failures.len(), 1);
    let failure = failures.iter().next().unwrap();
    assert_eq!(failure.key, "Taken.cs");
    assert_eq!(failure.path, root.join("Taken.cs"));
    assert!(root.join("Taken.cs").is_dir());
    Ok(())
}

#[test]
fn dropping_an_unsaved_context_touches_nothing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    {
        let mut context = OutputContext::new();
        let writer = context.get_or_create("Person.cs");
        writer.write_line("class Person");
        assert!(writer.decrease_indent().is_err());
    }
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}
