use tempfile::TempDir;

use noodle::core::{Executor, FailureKind, KernelAlert, ShellExecutor, execute_with_retry};
use noodle::{InodeHandle, NoodleConfig, NoodleError, VmAreaHandle, dispatch};

#[test]
fn test_shell_select_writes_control_file() {
    let scratch = TempDir::new().unwrap();
    let control_dir = TempDir::new().unwrap();
    let control = control_dir.path().join("nq_noodle_inode");
    let executor = ShellExecutor::new(scratch.path(), "echo unused");

    let select = noodle::core::exec::select_command("/tmp/with space/it's", &control);
    execute_with_retry(&executor, &select, NoodleConfig::default().inode.retry).unwrap();

    assert_eq!(std::fs::read_to_string(&control).unwrap(), "/tmp/with space/it's");
}

#[test]
fn test_shell_failure_surfaces_kernel_diagnostic() {
    let scratch = TempDir::new().unwrap();
    let config = NoodleConfig::default()
        .with_inode_control(scratch.path().join("missing-dir").join("nq_noodle_inode"))
        .with_diagnostic_command("echo '[ 12.3] Error -2 parsing path /nope'");
    let executor = ShellExecutor::new(scratch.path(), config.diagnostic_command.clone());
    let mut out = Vec::new();

    let err = dispatch(&InodeHandle::new("/nope"), &config, &executor, scratch.path(), &mut out)
        .unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::Fatal);
    assert_eq!(err.alert(), Some(KernelAlert::PathLookup));
    assert!(matches!(err, NoodleError::ExternalCommand { .. }));
    assert!(out.is_empty());
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_shell_copy_then_parse_failure() {
    let scratch = TempDir::new().unwrap();
    let control_dir = TempDir::new().unwrap();
    let control = control_dir.path().join("nq_noodle_inode");
    let config = NoodleConfig::default().with_inode_control(&control);
    let executor = ShellExecutor::new(scratch.path(), "echo unused");
    let mut out = Vec::new();

    // an ordinary file echoes the selector back, which is not a record
    let err = dispatch(&InodeHandle::new("/etc/hostname"), &config, &executor, scratch.path(), &mut out)
        .unwrap_err();

    assert!(matches!(err, NoodleError::MalformedRecord { .. }));
    assert!(out.is_empty());
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

#[test]
fn test_shell_executor_signal_is_failure() {
    let scratch = TempDir::new().unwrap();
    let executor = ShellExecutor::new(scratch.path(), "printf 'Error: bad argument'");
    let err = executor.execute("kill -9 $$").unwrap_err();
    assert_eq!(err.diagnostic(), Some("Error: bad argument"));
    assert_eq!(err.alert(), Some(KernelAlert::BadArgument));
}

#[test]
fn test_shell_vm_area_selects_decimal_pid() {
    let scratch = TempDir::new().unwrap();
    let control_dir = TempDir::new().unwrap();
    let control = control_dir.path().join("nq_noodle_vm_area");
    let config = NoodleConfig::default().with_vm_area_control(&control);
    let executor = ShellExecutor::new(scratch.path(), "echo unused");
    let mut out = Vec::new();

    // a plain file hands the pid back, a bare number rather than a record
    let err = dispatch(&VmAreaHandle::new(4242), &config, &executor, scratch.path(), &mut out)
        .unwrap_err();

    assert_eq!(std::fs::read_to_string(&control).unwrap(), "4242");
    assert!(matches!(err, NoodleError::MalformedRecord { kind: "vm_area", .. }));
    assert!(out.is_empty());
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}
