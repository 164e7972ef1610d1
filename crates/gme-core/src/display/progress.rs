//! Progress display utilities for long-running operations

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

const SPINNER_UPDATE_INTERVAL_MS: u64 = 100;
const CLEAR_LINE_WIDTH: usize = 100;

/// Simple spinner to show progress of asynchronous operations.
///
/// Draws on stderr so that stdout stays clean for `--format json`.
pub struct ProgressSpinner {
    message: String,
    running: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ProgressSpinner {
    pub fn new(message: String) -> Self {
        Self {
            message,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    pub fn start(&mut self) {
        self.running.store(true, Ordering::Relaxed);
        let running = Arc::clone(&self.running);
        let message = self.message.clone();

        let handle = thread::spawn(move || {
            let spinner_chars = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let mut index = 0;

            while running.load(Ordering::Relaxed) {
                eprint!("\r{} {}", spinner_chars[index], message);
                let _ = io::stderr().flush();

                index = (index + 1) % spinner_chars.len();
                thread::sleep(Duration::from_millis(SPINNER_UPDATE_INTERVAL_MS));
            }

            eprint!("\r{:<width$}\r", "", width = CLEAR_LINE_WIDTH);
            let _ = io::stderr().flush();
        });

        self.handle = Some(handle);
    }

    /// Stop spinner and display completion message
    pub fn stop(&mut self, completion_message: Option<&str>) {
        self.running.store(false, Ordering::Relaxed);

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }

        if let Some(msg) = completion_message {
            // Leading space keeps emoji from being clipped
            eprintln!(" {}", msg);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl Drop for ProgressSpinner {
    fn drop(&mut self) {
        self.stop(None);
    }
}

/// Display operation status with a leading symbol
pub fn display_status(operation: &str, status: OperationStatus) {
    println!("{}", format_status(operation, &status));
}

fn format_status(operation: &str, status: &OperationStatus) -> String {
    let (symbol, message) = match status {
        OperationStatus::Success => ("✅", format!("Completed: {}", operation)),
        OperationStatus::Error => ("❌", format!("Error: {}", operation)),
    };
    format!(" {} {}", symbol, message)
}

#[derive(Debug, Clone)]
pub enum OperationStatus {
    Success,
    Error,
}
