use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use stubgen_abi::Architecture;
use stubgen_core::{COMPAT_HEADER_PATH, DescriptorError, HeaderError};
use stubgen_fs::{
    DESCRIPTOR_FILE_NAME, FsError, PipelineError, RunOptions, RunReport, apply_delta, run,
};
use stubgen_tests::{LibcTreeFixture, TestFixture, init_test_logging};

const STUB_COUNT: usize = 35;

fn staged_text(report: &RunReport, relative: &str) -> String {
    let bytes = report
        .staged
        .get(Path::new(relative))
        .unwrap_or_else(|| panic!("{relative} was not staged"));
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn paths(list: &[&str]) -> BTreeSet<PathBuf> {
    list.iter().map(PathBuf::from).collect()
}

#[test]
fn second_run_after_apply_is_a_no_op() {
    init_test_logging();
    let fixture = LibcTreeFixture::setup().unwrap();

    let staging = fixture.staging();
    let first = run(&fixture.options(), &staging).unwrap();
    assert_eq!(first.staged.len(), STUB_COUNT + 1);
    assert_eq!(first.delta.added.len(), STUB_COUNT + 1);
    assert!(first.delta.changed.is_empty());
    assert!(first.delta.removed.is_empty());
    apply_delta(&first.delta, &staging, fixture.root()).unwrap();

    for _ in 0..2 {
        let staging = fixture.staging();
        let again = run(&fixture.options(), &staging).unwrap();
        assert!(again.delta.is_unchanged(), "{:?}", again.delta);
        assert_eq!(again.staged, first.staged);
    }
}

#[test]
fn dry_run_leaves_the_tree_untouched() {
    init_test_logging();
    let fixture = LibcTreeFixture::setup().unwrap();

    let staging = fixture.staging();
    let report = run(&fixture.options(), &staging).unwrap();
    assert!(!report.delta.is_unchanged());
    assert!(!fixture.exists("arch-arm/syscalls/close.S"));
    assert!(!fixture.exists(COMPAT_HEADER_PATH));

    let staging_root = staging.path().to_path_buf();
    assert!(staging_root.join("arch-arm/syscalls/close.S").is_file());
    drop(staging);
    assert!(!staging_root.exists());
}

#[test]
fn existing_tree_is_partitioned() {
    init_test_logging();
    let fixture = LibcTreeFixture::setup().unwrap();

    let staging = fixture.staging();
    let baseline = run(&fixture.options(), &staging).unwrap();
    apply_delta(&baseline.delta, &staging, fixture.root()).unwrap();

    fixture.write("arch-arm/syscalls/stale.S", "/* old */\n").unwrap();
    fixture.write("arch-x86/syscalls/close.S", "/* edited */\n").unwrap();
    fixture.write("arch-arm/syscalls/README", "not a stub\n").unwrap();
    fixture.remove("arch-mips/syscalls/read.S").unwrap();

    let staging = fixture.staging();
    let report = run(&fixture.options(), &staging).unwrap();
    assert_eq!(report.delta.added, paths(&["arch-mips/syscalls/read.S"]));
    assert_eq!(report.delta.changed, paths(&["arch-x86/syscalls/close.S"]));
    assert_eq!(report.delta.removed, paths(&["arch-arm/syscalls/stale.S"]));

    apply_delta(&report.delta, &staging, fixture.root()).unwrap();
    assert!(!fixture.exists("arch-arm/syscalls/stale.S"));
    assert!(fixture.exists("arch-arm/syscalls/README"));
    assert!(fixture.exists("arch-mips/syscalls/read.S"));
    assert_eq!(
        fixture.read("arch-x86/syscalls/close.S").unwrap(),
        staged_text(&report, "arch-x86/syscalls/close.S")
    );
}

#[test]
fn missing_kernel_header_only_fails_the_header() {
    init_test_logging();
    let fixture = LibcTreeFixture::setup().unwrap();
    fixture.remove("kernel/uapi/asm-mips/asm/unistd.h").unwrap();

    let staging = fixture.staging();
    let report = run(&fixture.options(), &staging).unwrap();
    match &report.header_error {
        Some(HeaderError::MissingHeader { guard, path, .. }) => {
            assert_eq!(*guard, "__mips__");
            assert!(path.ends_with("kernel/uapi/asm-mips/asm/unistd.h"));
        }
        None => panic!("expected a header error"),
    }
    assert_eq!(report.staged.len(), STUB_COUNT);
    assert!(!report.delta.added.contains(Path::new(COMPAT_HEADER_PATH)));
}

#[test]
fn header_is_generated_from_kernel_headers() {
    init_test_logging();
    let fixture = LibcTreeFixture::setup().unwrap();

    let staging = fixture.staging();
    let report = run(&fixture.options(), &staging).unwrap();
    assert!(report.header_error.is_none());
    let header = staged_text(&report, COMPAT_HEADER_PATH);
    assert!(header.contains("#if defined(__aarch64__)\n#define SYS_close __NR_close\n"));
    assert!(header.contains("#elif defined(__mips__)\n#define SYS_read __NR_read\n#elif"));
    assert!(header.contains("#define SYS_socketcall __NR_socketcall\n"));
    assert!(!header.contains("SYS_SYSCALL_BASE"));
    assert!(!header.contains("SYS_Linux"));
}

#[test]
fn disabled_header_is_never_removed() {
    init_test_logging();
    let fixture = LibcTreeFixture::setup().unwrap();
    fixture.write(COMPAT_HEADER_PATH, "/* hand written */\n").unwrap();

    let mut options = fixture.options();
    options.compat_header = false;
    let staging = fixture.staging();
    let report = run(&options, &staging).unwrap();
    assert!(!report.delta.removed.contains(Path::new(COMPAT_HEADER_PATH)));
    assert!(!report.delta.changed.contains(Path::new(COMPAT_HEADER_PATH)));
    assert_eq!(report.staged.len(), STUB_COUNT);
}

#[test]
fn output_does_not_depend_on_worker_count() {
    init_test_logging();
    let fixture = LibcTreeFixture::setup().unwrap();

    let staging = fixture.staging();
    let serial = run(&fixture.options(), &staging).unwrap();

    let mut options = fixture.options();
    options.jobs = 4;
    let staging = fixture.staging();
    let parallel = run(&options, &staging).unwrap();

    assert_eq!(serial.staged, parallel.staged);
    assert_eq!(serial.delta, parallel.delta);
}

#[test]
fn aliases_are_emitted_for_every_architecture() {
    init_test_logging();
    let fixture = LibcTreeFixture::setup().unwrap();

    let staging = fixture.staging();
    let report = run(&fixture.options(), &staging).unwrap();
    for arch in Architecture::ALL {
        let text = staged_text(&report, &format!("{}/foo.S", arch.stub_dir()));
        assert!(text.contains("ENTRY(foo)\n"), "{arch}");
        assert!(text.contains("__NR_realname"), "{arch}");
        assert!(text.contains("\nALIAS_SYMBOL(bar, foo)\n"), "{arch}");
        assert!(text.contains("\nALIAS_SYMBOL(baz, foo)\n"), "{arch}");
        assert!(!report.staged.contains(Path::new(&format!("{}/bar.S", arch.stub_dir()))));
    }
}

#[test]
fn hidden_symbols_follow_pointer_width() {
    init_test_logging();
    let fixture = LibcTreeFixture::setup().unwrap();

    let staging = fixture.staging();
    let report = run(&fixture.options(), &staging).unwrap();
    for arch in Architecture::ALL {
        let text = staged_text(&report, &format!("{}/__openat.S", arch.stub_dir()));
        assert_eq!(text.ends_with(".hidden __openat\n"), arch.is_lp64(), "{arch}");
        assert!(text.contains("__NR_openat"), "{arch}");
    }
}

#[test]
fn dispatch_entries_use_the_socketcall_template_on_x86() {
    init_test_logging();
    let fixture = LibcTreeFixture::setup().unwrap();

    let staging = fixture.staging();
    let report = run(&fixture.options(), &staging).unwrap();
    let x86 = staged_text(&report, "arch-x86/syscalls/socket.S");
    assert!(x86.contains("    mov     $1, %ebx\n"));
    assert!(x86.contains("$__NR_socketcall"));
    let arm = staged_text(&report, "arch-arm/syscalls/socket.S");
    assert!(arm.contains("__NR_socket\n"));
}

#[test]
fn dispatch_with_arm_aborts_the_run() {
    init_test_logging();
    let fixture = LibcTreeFixture::with_descriptor(
        "int close(int) all\n\
         int socket:socketcall:1 (int, int, int) arm\n\
         int bind:socketcall:2 (int, void*, int) all\n",
    )
    .unwrap();

    let staging = fixture.staging();
    match run(&fixture.options(), &staging) {
        Err(PipelineError::Descriptor(DescriptorError::Semantic(errors))) => {
            let lines: Vec<_> = errors.iter().map(|err| err.line()).collect();
            assert_eq!(lines, [2, 3]);
        }
        other => panic!("expected a semantic error, got {other:?}"),
    }
    assert!(!staging.path().join("arch-arm/syscalls/close.S").exists());
}

#[test]
fn syntax_errors_skip_only_their_line() {
    init_test_logging();
    let fixture = LibcTreeFixture::with_descriptor(
        "int close(int) all\nint broken int) all\nint vfork() custom\n",
    )
    .unwrap();

    let staging = fixture.staging();
    let report = run(&fixture.options(), &staging).unwrap();
    assert_eq!(report.syscall_count, 2);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].line(), 2);
    assert_eq!(report.staged.len(), Architecture::ALL.len() + 1);
    assert!(report.staged.paths().all(|path| !path.ends_with("vfork.S")));
}

#[test]
fn missing_descriptor_names_the_path() {
    init_test_logging();
    let fixture = LibcTreeFixture::setup().unwrap();
    let mut options = fixture.options();
    options.descriptor = fixture.path("NO_SUCH_SYSCALLS.TXT");

    let staging = fixture.staging();
    match run(&options, &staging) {
        Err(PipelineError::Descriptor(DescriptorError::Read { path, .. })) => {
            assert_eq!(path, fixture.path("NO_SUCH_SYSCALLS.TXT"));
        }
        other => panic!("expected a read error, got {other:?}"),
    }
}

#[test]
fn missing_libc_root_aborts_the_run() {
    init_test_logging();
    let fixture = LibcTreeFixture::setup().unwrap();
    let missing = fixture.path("no/such/libc");
    let mut options = RunOptions::new(&missing);
    options.descriptor = fixture.path(DESCRIPTOR_FILE_NAME);

    let staging = fixture.staging();
    match run(&options, &staging) {
        Err(PipelineError::Fs(FsError::Io { path, .. })) => assert_eq!(path, missing),
        other => panic!("expected an i/o error, got {other:?}"),
    }
    assert!(!missing.exists());
}

#[test]
fn missing_stub_directory_aborts_the_run() {
    init_test_logging();
    let fixture = LibcTreeFixture::with_descriptor("int close(int) arm\n").unwrap();
    std::fs::remove_dir_all(fixture.path("arch-mips64")).unwrap();

    let staging = fixture.staging();
    match run(&fixture.options(), &staging) {
        Err(PipelineError::Fs(err)) => assert!(err.path().ends_with("arch-mips64/syscalls")),
        other => panic!("expected an i/o error, got {other:?}"),
    }
}
