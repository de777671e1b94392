use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;

use noodle::core::{Executor, NoodleError};

/// Stands in for the kernel module: scripted selector outcomes, fixed record body
pub struct FakeKernel {
    select_failures: RefCell<VecDeque<String>>,
    record: String,
    pub commands: RefCell<Vec<String>>,
}

impl FakeKernel {
    pub fn new(record: &str) -> Self {
        Self {
            select_failures: RefCell::new(VecDeque::new()),
            record: record.to_string(),
            commands: RefCell::new(Vec::new()),
        }
    }

    /// Fail the next selector writes with these diagnostics, in order
    pub fn failing_selects(self, diagnostics: &[&str]) -> Self {
        self.select_failures
            .borrow_mut()
            .extend(diagnostics.iter().map(|d| d.to_string()));
        self
    }

    pub fn selects(&self) -> usize {
        self.commands.borrow().iter().filter(|c| c.starts_with("printf")).count()
    }
}

fn unquote(arg: &str) -> PathBuf {
    PathBuf::from(arg.trim().trim_matches('\''))
}

impl Executor for FakeKernel {
    fn execute(&self, command: &str) -> Result<(), NoodleError> {
        self.commands.borrow_mut().push(command.to_string());

        if command.starts_with("printf") {
            if let Some(diagnostic) = self.select_failures.borrow_mut().pop_front() {
                return Err(NoodleError::ExternalCommand {
                    command: command.to_string(),
                    diagnostic,
                });
            }
            return Ok(());
        }

        if command.starts_with("cat ") {
            let (_, dest) = command.rsplit_once(" > ").expect("copy command has a destination");
            std::fs::write(unquote(dest), &self.record).expect("write fake record");
            return Ok(());
        }

        panic!("unexpected command: {command}");
    }
}
