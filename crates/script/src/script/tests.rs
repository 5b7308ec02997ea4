use super::{MirrorDirection, MirrorOptions, Parallelism, ScriptBuilder, connection_statements};
use crate::settings::ConnectionSettings;

fn anonymous() -> ConnectionSettings {
    ConnectionSettings::builder("example.test")
        .build()
        .expect("settings should resolve")
}

fn authenticated() -> ConnectionSettings {
    ConnectionSettings::builder("example.test")
        .username("backup")
        .password("secret")
        .build()
        .expect("settings should resolve")
}

#[test]
fn raw_skips_empty_statements() {
    let mut builder = ScriptBuilder::new(true);
    builder.raw("").raw("ls");
    assert_eq!(builder.commands(), ["ls"]);
}

#[test]
fn raw_script_splits_on_the_statement_separator() {
    let mut builder = ScriptBuilder::new(true);
    builder.raw_script("cd /incoming;ls;");
    assert_eq!(builder.commands(), ["cd /incoming", "ls"]);
}

#[test]
fn navigation_statements_escape_their_paths() {
    let mut builder = ScriptBuilder::new(true);
    builder.ls().pwd().cd("annual reports").cat("read me.txt");
    assert_eq!(
        builder.commands(),
        ["ls", "pwd", "cd annual\\ reports", "cat read\\ me.txt"]
    );
}

#[test]
fn put_composes_with_and_without_a_destination() {
    let mut builder = ScriptBuilder::new(true);
    builder
        .put("report.csv", None)
        .put("report.csv", Some("uploads/report.csv"));
    assert_eq!(
        builder.commands(),
        ["put report.csv", "put report.csv -o uploads/report.csv"]
    );
}

#[test]
fn put_without_a_source_leaves_the_queue_unchanged() {
    let mut builder = ScriptBuilder::new(true);
    builder.put("", Some("uploads/report.csv"));
    assert!(builder.is_empty());
}

#[test]
fn get_composes_with_and_without_a_destination() {
    let mut builder = ScriptBuilder::new(true);
    builder
        .get("report.csv", None)
        .get("report.csv", Some("local/report.csv"));
    assert_eq!(
        builder.commands(),
        ["get report.csv", "get report.csv -o local/report.csv"]
    );
    builder.get("", None);
    assert_eq!(builder.commands().len(), 2);
}

#[test]
fn mv_requires_both_operands() {
    let mut builder = ScriptBuilder::new(true);
    builder.mv("a.txt", "").mv("", "b.txt").mv("a.txt", "b.txt");
    assert_eq!(builder.commands(), ["mv a.txt b.txt"]);
}

#[test]
fn removals_space_join_their_escaped_operands() {
    let mut builder = ScriptBuilder::new(true);
    builder
        .rm(["old.txt", "older file.txt"])
        .rmdir(["tmp", "scratch dir"]);
    assert_eq!(
        builder.commands(),
        ["rm old.txt older\\ file.txt", "rmdir tmp scratch\\ dir"]
    );
}

#[test]
fn removals_without_operands_are_no_ops() {
    let mut builder = ScriptBuilder::new(true);
    builder.rm(Vec::<String>::new());
    assert!(builder.is_empty());
}

#[test]
fn disabled_escaping_passes_tokens_through() {
    let mut builder = ScriptBuilder::new(false);
    builder.cd("annual reports");
    assert_eq!(builder.commands(), ["cd annual reports"]);
}

#[test]
fn mirror_defaults_to_a_download_of_the_current_directories() {
    let mut builder = ScriptBuilder::new(true);
    builder.mirror(&MirrorOptions::default());
    assert_eq!(builder.commands(), ["mirror . ."]);
}

#[test]
fn mirror_upload_reverses_the_operand_order() {
    let mut builder = ScriptBuilder::new(true);
    builder.mirror(&MirrorOptions {
        direction: MirrorDirection::Upload,
        remote_dir: "/remote".to_owned(),
        local_dir: "/local".to_owned(),
        ..MirrorOptions::default()
    });
    assert_eq!(builder.commands(), ["mirror -R /local /remote"]);

    let mut builder = ScriptBuilder::new(true);
    builder.mirror(&MirrorOptions {
        direction: MirrorDirection::Download,
        remote_dir: "/remote".to_owned(),
        local_dir: "/local".to_owned(),
        ..MirrorOptions::default()
    });
    assert_eq!(builder.commands(), ["mirror /remote /local"]);
}

#[test]
fn mirror_renders_parallelism_options_and_filter() {
    let mut builder = ScriptBuilder::new(true);
    builder.mirror(&MirrorOptions {
        parallel: Some(Parallelism::Auto),
        ..MirrorOptions::default()
    });
    builder.mirror(&MirrorOptions {
        parallel: Some(Parallelism::Jobs(4)),
        options: "--only-newer".to_owned(),
        filter: Some(r"\.csv$".to_owned()),
        ..MirrorOptions::default()
    });
    assert_eq!(
        builder.commands(),
        [
            "mirror --parallel . .",
            "mirror --parallel=4 --only-newer -i \"\\.csv$\" . ."
        ]
    );
}

#[test]
fn mirror_raises_zero_workers_to_one() {
    let mut builder = ScriptBuilder::new(true);
    builder.mirror(&MirrorOptions {
        parallel: Some(Parallelism::Jobs(0)),
        ..MirrorOptions::default()
    });
    assert_eq!(builder.commands(), ["mirror --parallel=1 . ."]);
}

#[test]
fn preamble_carries_the_retry_and_timeout_knobs() {
    let settings = ConnectionSettings::builder("example.test")
        .retries(3)
        .timeout(20)
        .retry_interval(7)
        .retry_interval_multiplier(2)
        .build()
        .expect("settings should resolve");
    assert_eq!(
        connection_statements(&settings),
        [
            "set net:max-retries 3",
            "set net:timeout 20",
            "set net:reconnect-interval-base 7",
            "set net:reconnect-interval-multiplier 2",
            "open \"ftp://example.test\"",
        ]
    );
}

#[test]
fn open_carries_credentials_only_when_a_username_is_set() {
    let statements = connection_statements(&authenticated());
    assert_eq!(
        statements.last().map(String::as_str),
        Some("open -u \"backup\",\"secret\" \"ftp://example.test\"")
    );

    let statements = connection_statements(&anonymous());
    assert_eq!(
        statements.last().map(String::as_str),
        Some("open \"ftp://example.test\"")
    );
}

#[test]
fn open_escapes_credentials() {
    let settings = ConnectionSettings::builder("example.test")
        .username("back up")
        .password("pa$s")
        .build()
        .expect("settings should resolve");
    assert_eq!(
        connection_statements(&settings).last().map(String::as_str),
        Some("open -u \"back\\ up\",\"pa\\$s\" \"ftp://example.test\"")
    );
}

#[test]
fn auto_confirm_is_limited_to_protocols_that_support_it() {
    let sftp = ConnectionSettings::builder("example.test")
        .protocol("sftp")
        .auto_confirm(true)
        .build()
        .expect("settings should resolve");
    assert_eq!(
        connection_statements(&sftp).first().map(String::as_str),
        Some("set sftp:auto-confirm yes")
    );

    let ftp = ConnectionSettings::builder("example.test")
        .auto_confirm(true)
        .build()
        .expect("settings should resolve");
    assert!(
        connection_statements(&ftp)
            .iter()
            .all(|statement| !statement.contains("auto-confirm"))
    );
}

#[test]
fn key_authentication_overrides_the_sftp_connect_program() {
    let settings = ConnectionSettings::builder("example.test")
        .protocol("sftp")
        .ssh_key("/home/backup/.ssh/id_ed25519")
        .build()
        .expect("settings should resolve");
    assert!(connection_statements(&settings).contains(
        &"set sftp:connect-program \"ssh -a -x -i /home/backup/.ssh/id_ed25519\"".to_owned()
    ));
}

#[test]
fn extra_statements_are_inserted_before_open() {
    let settings = ConnectionSettings::builder("example.test")
        .extra_statements("set xfer:clobber on;set cmd:fail-exit yes")
        .build()
        .expect("settings should resolve");
    let statements = connection_statements(&settings);
    let position = statements
        .iter()
        .position(|statement| statement.starts_with("set xfer:clobber"))
        .expect("extra statements should be present");
    assert_eq!(position, statements.len() - 2);
}

#[test]
fn finalize_prepends_the_preamble_and_drains_the_queue() {
    let settings = authenticated();
    let mut builder = ScriptBuilder::new(settings.escape_enabled());
    builder.cd("/incoming").put("report.csv", None);

    let script = builder.finalize(&settings);
    assert_eq!(
        script,
        "set net:max-retries 1;set net:timeout 10;set net:reconnect-interval-base 5;\
         set net:reconnect-interval-multiplier 1;\
         open -u \"backup\",\"secret\" \"ftp://example.test\";cd /incoming;put report.csv"
    );
    assert!(builder.is_empty());

    // The builder is reusable after finalizing.
    builder.ls();
    let script = builder.finalize(&settings);
    assert!(script.ends_with(";ls"));
}

#[test]
fn preview_does_not_drain_the_queue() {
    let settings = anonymous();
    let mut builder = ScriptBuilder::new(true);
    builder.ls();
    let preview = builder.preview(&settings);
    assert!(preview.ends_with(";ls"));
    assert_eq!(builder.commands(), ["ls"]);
}
