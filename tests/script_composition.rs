//! Composition-level tests for the fluent client: no process is spawned.

use oc_lftp::{ConnectionSettings, Lftp, MirrorDirection, MirrorOptions, Parallelism};

fn client() -> Lftp {
    let settings = ConnectionSettings::builder("example.test")
        .username("backup")
        .password("secret")
        .build()
        .expect("settings should resolve");
    Lftp::new(settings)
}

#[test]
fn chained_statements_keep_their_insertion_order() {
    let mut client = client();
    client
        .cd("/incoming")
        .put("report.csv", None)
        .mv("report.csv", "report.done")
        .ls();
    assert_eq!(
        client.pending_commands(),
        [
            "cd /incoming",
            "put report.csv",
            "mv report.csv report.done",
            "ls"
        ]
    );
}

#[test]
fn preview_prepends_the_connection_preamble() {
    let mut client = client();
    client.ls();
    let script = client.preview();
    assert!(script.starts_with("set net:max-retries 1;"));
    assert!(script.contains("open -u \"backup\",\"secret\" \"ftp://example.test\""));
    assert!(script.ends_with(";ls"));
    // Preview leaves the queue intact.
    assert_eq!(client.pending_commands(), ["ls"]);
}

#[test]
fn aliases_compose_the_same_statements_as_their_canonical_forms() {
    let mut canonical = client();
    canonical
        .put("a.txt", Some("b.txt"))
        .get("c.txt", None)
        .mv("d.txt", "e.txt")
        .rm(["f.txt"]);

    let mut aliased = client();
    aliased
        .add_file("a.txt", Some("b.txt"))
        .get_file("c.txt", None)
        .move_file("d.txt", "e.txt")
        .remove(["f.txt"]);

    assert_eq!(canonical.pending_commands(), aliased.pending_commands());
}

#[test]
fn empty_operands_leave_the_queue_unchanged() {
    let mut client = client();
    client
        .raw("")
        .put("", None)
        .get("", Some("x"))
        .mv("a", "")
        .mv("", "b");
    assert!(client.pending_commands().is_empty());
}

#[test]
fn mirror_composes_through_the_facade() {
    let mut client = client();
    client.mirror(&MirrorOptions {
        direction: MirrorDirection::Upload,
        remote_dir: "/srv/drop".to_owned(),
        local_dir: "out".to_owned(),
        parallel: Some(Parallelism::Jobs(3)),
        ..MirrorOptions::default()
    });
    assert_eq!(
        client.pending_commands(),
        ["mirror -R --parallel=3 out /srv/drop"]
    );
}

#[test]
fn escaping_toggle_flows_from_settings_into_the_queue() {
    let settings = ConnectionSettings::builder("example.test")
        .escape(false)
        .build()
        .expect("settings should resolve");
    let mut client = Lftp::new(settings);
    client.cd("annual reports");
    assert_eq!(client.pending_commands(), ["cd annual reports"]);
}
