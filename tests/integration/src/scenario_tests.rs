//! End-to-end reconciliation scenarios
//!
//! Each test builds a root directory, runs the whole pipeline (config,
//! protect paths, scan, mask pass, trivial pass, menus) with scripted
//! answers and checks the files left behind.

use std::fs;

use etcup_core::{
    NOTHING_LEFT, Notice, ReconcileReport, ReconciliationOptions, RunEnvironment,
    ScriptedOperator,
};
use etcup_test_utils::TestRoot;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn env() -> RunEnvironment {
    RunEnvironment {
        pager: Some("cat".to_string()),
        ..Default::default()
    }
}

fn reconcile(
    root: &TestRoot,
    options: ReconciliationOptions,
    responses: &[&str],
) -> (ReconcileReport, ScriptedOperator) {
    let mut operator = ScriptedOperator::new(responses.iter().copied());
    let report = etcup_core::run(root.root(), options, &env(), &mut operator).unwrap();
    (report, operator)
}

fn root_with_config() -> TestRoot {
    let root = TestRoot::new();
    root.write_editor_config();
    root
}

#[test]
fn scenario_a_automerge_all() {
    let root = root_with_config();
    root.write("/etc/foo.conf", "setting=old\n");
    root.stage("/etc/foo.conf", 1, "setting=new\n");

    let (report, _) = reconcile(&root, ReconciliationOptions::default(), &["-3"]);

    root.assert_content("/etc/foo.conf", "setting=new\n");
    root.assert_file_not_exists("/etc/._cfg0001_foo.conf");
    assert_eq!(report.replaced, vec!["/etc/foo.conf"]);
}

#[test]
fn scenario_b_discard_all() {
    let root = root_with_config();
    root.write("/etc/bar.conf", "setting=old\n");
    root.stage("/etc/bar.conf", 5, "setting=new\n");

    let (report, _) = reconcile(&root, ReconciliationOptions::default(), &["-7"]);

    root.assert_content("/etc/bar.conf", "setting=old\n");
    root.assert_file_not_exists("/etc/._cfg0005_bar.conf");
    assert_eq!(report.discarded, vec!["/etc/._cfg0005_bar.conf"]);
}

#[test]
fn scenario_c_masked_file_needs_no_prompt() {
    let root = root_with_config();
    root.write("/etc/os-release", "NAME=old\n");
    root.stage("/etc/os-release", 1, "NAME=new\n");

    let (report, operator) = reconcile(&root, ReconciliationOptions::default(), &[]);

    root.assert_content("/etc/os-release", "NAME=new\n");
    root.assert_file_not_exists("/etc/._cfg0001_os-release");
    assert!(operator.menus().is_empty());
    assert_eq!(report.masked, vec!["/etc/os-release"]);
}

#[test]
fn masked_file_takes_last_candidate() {
    let root = root_with_config();
    root.write("/etc/local.conf", "v=0\n");
    root.stage("/etc/local.conf", 1, "v=1\n");
    root.stage("/etc/local.conf", 2, "v=2\n");
    let options = ReconciliationOptions {
        paths: vec!["/etc".to_string()],
        mask_paths: vec!["/etc/local.conf".to_string()],
        ..Default::default()
    };

    let (_, operator) = reconcile(&root, options, &[]);

    root.assert_content("/etc/local.conf", "v=2\n");
    root.assert_file_not_exists("/etc/._cfg0001_local.conf");
    root.assert_file_not_exists("/etc/._cfg0002_local.conf");
    assert!(
        operator
            .notices()
            .iter()
            .any(|(_, m)| m == "Automerging file /etc/local.conf config protect masked.")
    );
}

#[test]
fn relative_mask_entry_is_honoured() {
    let root = root_with_config();
    root.write("/etc/local.conf", "v=0\n");
    root.stage("/etc/local.conf", 1, "v=1\n");
    let options = ReconciliationOptions {
        paths: vec!["/etc".to_string()],
        mask_paths: vec!["etc/local.conf".to_string()],
        ..Default::default()
    };

    let (report, operator) = reconcile(&root, options, &[]);

    root.assert_content("/etc/local.conf", "v=1\n");
    assert_eq!(report.masked, vec!["/etc/local.conf"]);
    assert!(operator.menus().is_empty());
}

#[test]
fn profile_mask_is_honoured() {
    let root = root_with_config();
    root.write(
        "/etc/profile.env",
        "export CONFIG_PROTECT='/usr/share/config'\nexport CONFIG_PROTECT_MASK='/etc/env.d/00basic'\n",
    );
    root.write("/etc/env.d/00basic", "PATH=/bin\n");
    root.stage("/etc/env.d/00basic", 1, "PATH=/usr/bin\n");
    root.write("/usr/share/config/app.rc", "a=1\n");
    root.stage("/usr/share/config/app.rc", 1, "a=2\n");

    // Only app.rc is offered; discard its update
    let (report, operator) = reconcile(&root, ReconciliationOptions::default(), &["-7"]);

    root.assert_content("/etc/env.d/00basic", "PATH=/usr/bin\n");
    root.assert_content("/usr/share/config/app.rc", "a=1\n");
    assert_eq!(operator.menus()[0].entries.len(), 1);
    assert_eq!(operator.menus()[0].entries[0].label, "/usr/share/config/app.rc");
    assert_eq!(report.masked, vec!["/etc/env.d/00basic"]);
}

#[test]
fn scenario_d_orphan_is_deleted() {
    let root = root_with_config();
    root.write("/etc/._cfg0002_missing.conf", "orphan\n");

    let (report, operator) = reconcile(&root, ReconciliationOptions::default(), &[]);

    root.assert_file_not_exists("/etc/._cfg0002_missing.conf");
    root.assert_file_not_exists("/etc/missing.conf");
    assert_eq!(report.orphans_removed, vec!["/etc/._cfg0002_missing.conf"]);
    assert!(operator.menus().is_empty());
    assert!(
        operator
            .notices()
            .iter()
            .any(|(notice, m)| *notice == Notice::Info && m == NOTHING_LEFT)
    );
}

#[test]
fn scenario_e_diff_keeps_candidate() {
    let root = root_with_config();
    root.write("/etc/app.conf", "v=0\n");
    root.stage("/etc/app.conf", 1, "v=1\n");

    // file, candidate, show diff, ignore, leave file, exit
    let (report, operator) = reconcile(
        &root,
        ReconciliationOptions::default(),
        &["1", "1", "4", "-1", "-1", "-1"],
    );

    root.assert_file_exists("/etc/._cfg0001_app.conf");
    root.assert_content("/etc/app.conf", "v=0\n");
    assert_eq!(report.unresolved, vec!["/etc/._cfg0001_app.conf"]);
    let menus = operator.menus();
    assert_eq!(menus[3], menus[2]);
}

#[test]
fn identical_updates_are_dropped_before_prompting() {
    let root = root_with_config();
    root.write("/etc/same.conf", "x=1\n");
    root.stage("/etc/same.conf", 1, "x=1\n");
    root.write("/etc/comments.conf", "# v1\ny=2\n");
    root.stage("/etc/comments.conf", 1, "# v2\n\ny=2\n");

    let (report, operator) = reconcile(&root, ReconciliationOptions::default(), &["-1"]);

    root.assert_content("/etc/same.conf", "x=1\n");
    root.assert_file_not_exists("/etc/._cfg0001_same.conf");
    root.assert_content("/etc/comments.conf", "# v1\ny=2\n");
    root.assert_file_exists("/etc/._cfg0001_comments.conf");
    assert_eq!(report.trivial, vec!["/etc/._cfg0001_same.conf"]);
    assert_eq!(operator.menus().len(), 1);
    assert_eq!(operator.menus()[0].entries[0].label, "/etc/comments.conf");
}

#[test]
fn discard_all_keeps_original_when_only_comments_change() {
    let root = root_with_config();
    root.write("/etc/bar.conf", "# shipped 1.0\nsetting=old\n");
    root.stage("/etc/bar.conf", 5, "# shipped 1.1\nsetting=old\n");
    let options = ReconciliationOptions {
        discard_all: true,
        ..Default::default()
    };

    let (report, operator) = reconcile(&root, options, &[]);

    root.assert_content("/etc/bar.conf", "# shipped 1.0\nsetting=old\n");
    root.assert_file_not_exists("/etc/._cfg0005_bar.conf");
    assert_eq!(report.discarded, vec!["/etc/._cfg0005_bar.conf"]);
    assert!(report.trivial.is_empty());
    assert!(operator.menus().is_empty());
}

#[test]
fn trivial_pass_respects_configuration() {
    let root = TestRoot::new();
    root.write_config("using_editor=1\ndiff_command=\"true %file1 %file2\"\neu_automerge=no\n");
    root.write("/etc/same.conf", "x=1\n");
    root.stage("/etc/same.conf", 1, "x=1\n");

    let (report, operator) = reconcile(&root, ReconciliationOptions::default(), &["-1"]);

    root.assert_file_exists("/etc/._cfg0001_same.conf");
    assert!(report.trivial.is_empty());
    assert_eq!(operator.menus().len(), 1);
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let root = TestRoot::new();
    root.write_config("this is not a config file\n");
    root.write("/etc/a.conf", "a=1\n");
    root.stage("/etc/a.conf", 1, "a=2\n");
    let scratch = TempDir::new().unwrap();
    let env = RunEnvironment {
        pager: Some("cat".to_string()),
        scratch_base: Some(scratch.path().to_path_buf()),
        ..Default::default()
    };
    let mut operator = ScriptedOperator::new(["-7"]);

    // Defaults run `diff` for the startup check; either it works and the
    // run proceeds, or the run stops before touching anything.
    let result = etcup_core::run(root.root(), ReconciliationOptions::default(), &env, &mut operator);

    assert_eq!(operator.warnings().len(), 1);
    match result {
        Ok(_) => root.assert_file_not_exists("/etc/._cfg0001_a.conf"),
        Err(e) => {
            assert!(e.to_string().contains("does not seem to work"));
            root.assert_file_exists("/etc/._cfg0001_a.conf");
        }
    }
    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn diff_probe_uses_configured_command() {
    let root = TestRoot::new();
    root.write_config("diff_command=\"true %file1 %file2\"\n");
    root.write("/etc/a.conf", "a=1\n");
    root.stage("/etc/a.conf", 1, "a=2\n");

    let (report, _) = reconcile(&root, ReconciliationOptions::default(), &["-3"]);

    root.assert_content("/etc/a.conf", "a=2\n");
    assert_eq!(report.replaced, vec!["/etc/a.conf"]);
}

#[test]
fn nested_directories_and_coalescing() {
    let root = root_with_config();
    root.write("/etc/conf.d/net", "n=0\n");
    root.stage("/etc/conf.d/net", 1, "n=1\n");
    root.stage("/etc/conf.d/net", 2, "n=2\n");
    root.write("/etc/portage/make.conf", "m=0\n");
    root.stage("/etc/portage/make.conf", 1, "m=1\n");

    let (_, operator) = reconcile(&root, ReconciliationOptions::default(), &["-1"]);

    let labels: Vec<&str> = operator.menus()[0]
        .entries
        .iter()
        .map(|e| e.label.as_str())
        .collect();
    assert_eq!(labels, vec!["/etc/conf.d/net", "/etc/portage/make.conf"]);
}

#[test]
fn nothing_to_do_without_updates() {
    let root = root_with_config();
    root.write("/etc/a.conf", "a=1\n");

    let (report, operator) = reconcile(&root, ReconciliationOptions::default(), &[]);

    assert_eq!(report, ReconcileReport::default());
    assert!(operator.menus().is_empty());
}
