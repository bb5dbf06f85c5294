use crate::domain::payment::{PaymentRequest, PaymentSettings, PaymentStatus};
use crate::domain::ports::ClientHandler;
use crate::error::Result;
use crate::testing::{sample_payment, sample_request};
use std::time::{Duration, Instant};
use tracing::debug;

/// Fixed iteration count for benchmark probes. Sequential on purpose:
/// throughput numbers stay comparable and free of contention artifacts.
pub const BENCH_ITERATIONS: usize = 1000;

/// A harness test mode, selected by name on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    Validate,
    Simulate,
    Benchmark,
}

impl TestMode {
    /// Parses a mode name. Unknown names yield `None`; the caller prints a
    /// usage hint and performs no operation.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "validate" => Some(TestMode::Validate),
            "simulate" => Some(TestMode::Simulate),
            "benchmark" => Some(TestMode::Benchmark),
            _ => None,
        }
    }
}

/// Summary of a `validate` run: request acceptances/rejections plus
/// per-lifecycle-callback outcomes.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidateSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub lifecycle_passed: usize,
    pub lifecycle_failed: usize,
}

/// Summary of a `simulate` run.
#[derive(Debug, Default)]
pub struct SimulateSummary {
    pub completed: bool,
    pub generated_order_id: Option<String>,
    pub settings: Option<PaymentSettings>,
}

/// One benchmark probe result.
#[derive(Debug)]
pub struct BenchmarkProbe {
    pub name: &'static str,
    pub iterations: usize,
    pub duration: Duration,
    pub ops_per_sec: f64,
}

#[derive(Debug, Default)]
pub struct BenchmarkSummary {
    pub probes: Vec<BenchmarkProbe>,
}

/// Drives a verified, conformant handler through one of the three test
/// modes. Sub-check failures are reported, never fatal.
pub struct Harness {
    verbose: bool,
}

impl Harness {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run(&self, mode: TestMode, handler: &dyn ClientHandler) {
        match mode {
            TestMode::Validate => {
                self.run_validate(handler);
            }
            TestMode::Simulate => {
                self.run_simulate(handler);
            }
            TestMode::Benchmark => {
                self.run_benchmark(handler);
            }
        }
    }

    /// Structural validation: one known-good and three known-bad requests
    /// through `validate_request`, then each lifecycle callback once. All
    /// probes always run; individual failures never abort the mode.
    pub fn run_validate(&self, handler: &dyn ClientHandler) -> ValidateSummary {
        println!("\nRunning validation tests...");
        let mut summary = ValidateSummary::default();

        let valid_request = sample_request();
        match handler.validate_request(&valid_request) {
            Ok(()) => {
                summary.accepted += 1;
                println!("[ok] valid request passed");
            }
            Err(err) => println!("[fail] valid request rejected: {err}"),
        }

        for (name, request) in invalid_requests() {
            match handler.validate_request(&request) {
                Err(err) => {
                    summary.rejected += 1;
                    if self.verbose {
                        println!("[ok] {name} correctly rejected: {err}");
                    }
                }
                Ok(()) => println!("[fail] {name} should have been rejected"),
            }
        }

        let payment = sample_payment();
        let lifecycle: [(&str, LifecycleFn); 4] = [
            ("handle_payment_created", |h, p| h.handle_payment_created(p)),
            ("handle_payment_success", |h, p| h.handle_payment_success(p)),
            ("handle_payment_failed", |h, p| h.handle_payment_failed(p)),
            ("handle_payment_canceled", |h, p| h.handle_payment_canceled(p)),
        ];
        for (name, callback) in lifecycle {
            match callback(handler, &payment) {
                Ok(()) => {
                    summary.lifecycle_passed += 1;
                    if self.verbose {
                        println!("[ok] {name} passed");
                    }
                }
                Err(err) => {
                    summary.lifecycle_failed += 1;
                    println!("[fail] {name} failed: {err}");
                }
            }
        }

        summary
    }

    /// End-to-end lifecycle walk: create, optional delay, mark success,
    /// success callback, then generator probing when one is attached.
    /// Remaining steps abort if the created callback itself fails.
    pub fn run_simulate(&self, handler: &dyn ClientHandler) -> SimulateSummary {
        println!("\nRunning payment simulation...");
        let mut summary = SimulateSummary::default();
        let mut payment = sample_payment();

        println!("1. Payment created...");
        if let Err(err) = handler.handle_payment_created(&payment) {
            println!("[fail] payment creation failed: {err}");
            return summary;
        }

        if self.verbose {
            println!("   Waiting 100ms...");
            std::thread::sleep(Duration::from_millis(100));
        }

        println!("2. Payment successful...");
        if let Err(err) = payment.transition(PaymentStatus::Success) {
            println!("[fail] status transition failed: {err}");
            return summary;
        }
        if let Err(err) = handler.handle_payment_success(&payment) {
            println!("[fail] payment success handling failed: {err}");
            return summary;
        }
        summary.completed = true;
        println!("[ok] payment simulation completed");

        if let Some(generator) = handler.payment_link_generator() {
            println!("\nProbing payment generator...");
            let request = sample_request();
            match generator.generate_payment_data(&request) {
                Ok(result) => {
                    println!(
                        "[ok] payment data generated: order_id={}, amount={}",
                        result.order_id, result.amount
                    );
                    summary.generated_order_id = Some(result.order_id);
                }
                Err(err) => println!("[fail] payment data generation failed: {err}"),
            }

            let settings = generator.payment_settings();
            println!(
                "[ok] payment settings: currency={}, sandbox={}",
                settings.currency, settings.sandbox_mode
            );
            summary.settings = Some(settings);
        }

        summary
    }

    /// Fixed-iteration throughput measurement, sequential on one thread.
    pub fn run_benchmark(&self, handler: &dyn ClientHandler) -> BenchmarkSummary {
        println!("\nRunning benchmarks ({BENCH_ITERATIONS} iterations per probe)...");
        let mut summary = BenchmarkSummary::default();
        let payment = sample_payment();
        let request = sample_request();

        summary.probes.push(probe("handle_payment_created", || {
            let _ = handler.handle_payment_created(&payment);
        }));
        summary.probes.push(probe("validate_request", || {
            let _ = handler.validate_request(&request);
        }));

        if let Some(generator) = handler.payment_link_generator() {
            summary.probes.push(probe("generate_payment_data", || {
                let _ = generator.generate_payment_data(&request);
            }));
        }

        summary
    }
}

type LifecycleFn = fn(&dyn ClientHandler, &crate::domain::payment::Payment) -> Result<()>;

fn probe(name: &'static str, mut op: impl FnMut()) -> BenchmarkProbe {
    debug!(probe = name, "benchmarking");
    let start = Instant::now();
    for _ in 0..BENCH_ITERATIONS {
        op();
    }
    let duration = start.elapsed();
    let ops_per_sec = BENCH_ITERATIONS as f64 / duration.as_secs_f64().max(f64::EPSILON);
    println!(
        "[ok] {name}: {BENCH_ITERATIONS} operations in {duration:?} ({ops_per_sec:.0} ops/sec)"
    );
    BenchmarkProbe {
        name,
        iterations: BENCH_ITERATIONS,
        duration,
        ops_per_sec,
    }
}

/// The three canned rejection cases every conforming handler must refuse.
fn invalid_requests() -> Vec<(&'static str, PaymentRequest)> {
    vec![
        (
            "negative amount",
            PaymentRequest {
                amount: -100,
                ..sample_request()
            },
        ),
        (
            "empty description",
            PaymentRequest {
                description: String::new(),
                ..sample_request()
            },
        ),
        (
            "empty return URL",
            PaymentRequest {
                return_url: String::new(),
                ..sample_request()
            },
        ),
    ]
}
