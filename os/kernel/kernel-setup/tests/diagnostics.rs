mod common;

use common::{RecordingHardware, sample_handlers};
use kernel_setup::addresses::LinearAddress;
use kernel_setup::{DescriptorTables, setup};
use log::{LevelFilter, Log, Metadata, Record};
use std::sync::Mutex;

struct Capture {
    lines: Mutex<Vec<String>>,
}

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("[{}] {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture {
    lines: Mutex::new(Vec::new()),
};

#[test]
fn install_reports_table_and_pointer_addresses() {
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(LevelFilter::Debug);

    let mut tables = Box::new(DescriptorTables::new());
    let mut hw = RecordingHardware::default();
    let loaded = unsafe { setup(&mut tables, &sample_handlers(), &mut hw) };

    let gdt = loaded.gdt_pointer().base();
    let gdt_pointer = LinearAddress::from_ptr(loaded.gdt_pointer());
    let idt = loaded.idt_pointer().base();
    let idt_pointer = LinearAddress::from_ptr(loaded.idt_pointer());

    let lines = CAPTURE.lines.lock().unwrap();
    let info: Vec<&str> = lines
        .iter()
        .filter_map(|line| line.strip_prefix("[INFO] "))
        .collect();

    assert_eq!(
        info,
        [
            format!("gdt at {gdt:x}"),
            format!("gdt pointer at {gdt_pointer:x}"),
            format!("idt at {idt:x}"),
            format!("idt pointer at {idt_pointer:x}"),
        ]
    );
    // Bare hex digits, no radix prefix.
    assert!(info.iter().all(|line| !line.contains("0x")));

    let logged = |prefix: &str| lines.iter().any(|line| line.starts_with(prefix));
    assert!(logged("[DEBUG] remapping PIC"));
    assert!(logged("[DEBUG] tss at "));
}
