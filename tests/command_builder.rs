// tests/command_builder.rs

use scanqueue::config::RawConfigFile;
use scanqueue::errors::RequestError;
use scanqueue::exec::CommandTemplate;
use scanqueue_test_utils::builders::ConfigFileBuilder;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn default_template_reproduces_the_downloader_invocation() {
    let cfg = ConfigFileBuilder::new().build();
    let cmd = cfg.template.build("http://example.com/files/").unwrap();

    assert_eq!(
        cmd.program(),
        "/app/src/OpenDirectoryDownloader/OpenDirectoryDownloader-linux"
    );
    assert_eq!(
        cmd.args(),
        strings(&[
            "--postgres",
            "--postgres-connection",
            "Host=postgres_db;Username=postgres;Password=mysecretpassword;Database=postgres",
            "--url",
            "http://example.com/files/",
            "-q",
        ])
        .as_slice()
    );
}

#[test]
fn locator_with_shell_metacharacters_stays_one_argument() {
    let template = CommandTemplate::new("scanner", vec![], Some("--url".to_string()), vec![]);

    for hostile in [
        "\"; rm -rf /",
        "; rm -rf /",
        "$(whoami)",
        "`id`",
        "a b c",
        "http://x --postgres-connection evil",
        "'quoted' \"double\" \\back",
    ] {
        let cmd = template.build(hostile).unwrap();
        assert_eq!(cmd.args(), strings(&["--url", hostile]).as_slice(), "{hostile}");
    }
}

#[test]
fn empty_or_blank_locator_is_rejected() {
    let template = CommandTemplate::new("scanner", vec![], None, vec![]);

    assert_eq!(template.build(""), Err(RequestError::MissingLocator));
    assert_eq!(template.build("   \t"), Err(RequestError::MissingLocator));
}

#[test]
fn empty_url_flag_passes_locator_positionally() {
    let cfg = ConfigFileBuilder::new()
        .program("scanner")
        .args(&["--fast"])
        .url_flag("")
        .trailing_args(&["--quiet"])
        .build();

    let cmd = cfg.template.build("http://example.com").unwrap();
    assert_eq!(
        cmd.args(),
        strings(&["--fast", "http://example.com", "--quiet"]).as_slice()
    );
}

#[test]
fn building_does_not_change_the_template() {
    let cfg = scanqueue::config::ConfigFile::try_from(RawConfigFile::default()).unwrap();
    let before = cfg.template.clone();

    let a = cfg.template.build("http://a").unwrap();
    let b = cfg.template.build("http://b").unwrap();

    assert_eq!(cfg.template, before);
    assert_ne!(a, b);
}

#[test]
fn display_quotes_each_argument() {
    let template = CommandTemplate::new("scanner", vec![], Some("--url".to_string()), vec![]);
    let cmd = template.build("a b").unwrap();

    assert_eq!(cmd.to_string(), r#"scanner "--url" "a b""#);
}
