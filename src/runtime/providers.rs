//! Execution provider selection
//!
//! The provider is chosen once per process from the `--provider` flag.
//! Anything unavailable falls back to the CPU provider ONNX Runtime always
//! has.

use anyhow::{Context, Result};
use ort::ep::ExecutionProvider;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crate::ui;

pub use crate::cli::Provider;

static SELECTED_PROVIDER: OnceLock<Provider> = OnceLock::new();
static PROVIDER_LOGGED: AtomicBool = AtomicBool::new(false);

/// Accelerators tried by `Provider::Auto`, best first
const AUTO_ORDER: [Provider; 4] = [Provider::Tensorrt, Provider::Cuda, Provider::Coreml, Provider::Xnnpack];

/// Upper bound on ONNX Runtime intra-op threads
const MAX_INTRA_THREADS: usize = 4;

impl Provider {
	pub fn label(self) -> &'static str {
		match self {
			Provider::Auto => "auto",
			Provider::Cpu => "CPU",
			Provider::Cuda => "CUDA",
			Provider::Tensorrt => "TensorRT",
			Provider::Coreml => "CoreML",
			Provider::Xnnpack => "XNNPACK",
		}
	}
}

pub fn set_provider(p: Provider) {
	let _ = SELECTED_PROVIDER.set(p);
}

pub fn selected_provider() -> Provider {
	SELECTED_PROVIDER.get().copied().unwrap_or_default()
}

/// Build an optimized session for `model_path` on the selected provider
pub fn create_session(model_path: &Path) -> Result<Session> {
	let mut builder = Session::builder().context("Failed to create session builder")?;

	let active = match selected_provider() {
		Provider::Auto => AUTO_ORDER
			.into_iter()
			.find(|&p| register(p, &mut builder))
			.unwrap_or(Provider::Cpu),
		Provider::Cpu => Provider::Cpu,
		requested => {
			if register(requested, &mut builder) {
				requested
			} else {
				ui::error(&format!("{} requested but unavailable, falling back to CPU", requested.label()));
				Provider::Cpu
			}
		}
	};

	if !PROVIDER_LOGGED.swap(true, Ordering::Relaxed) {
		ui::info(&format!("Using {} execution provider", active.label()));
	}

	let threads = std::thread::available_parallelism()
		.map(|n| n.get().min(MAX_INTRA_THREADS))
		.unwrap_or(1);

	builder
		.with_optimization_level(GraphOptimizationLevel::Level3)?
		.with_intra_threads(threads)?
		.commit_from_file(model_path)
		.with_context(|| format!("Failed to load model from {}", model_path.display()))
}

/// Try to register one accelerator on the builder
fn register(provider: Provider, builder: &mut SessionBuilder) -> bool {
	match provider {
		Provider::Cuda => register_ep(ort::ep::CUDA::default(), builder, provider),
		Provider::Tensorrt => register_ep(ort::ep::TensorRT::default(), builder, provider),
		#[cfg(target_os = "macos")]
		Provider::Coreml => register_ep(ort::ep::CoreML::default(), builder, provider),
		#[cfg(not(target_os = "macos"))]
		Provider::Coreml => {
			ui::debug("CoreML is only available on macOS");
			false
		}
		Provider::Xnnpack => register_ep(ort::ep::XNNPACK::default(), builder, provider),
		Provider::Auto | Provider::Cpu => false,
	}
}

fn register_ep<E: ExecutionProvider>(ep: E, builder: &mut SessionBuilder, provider: Provider) -> bool {
	ui::debug(&format!("Trying provider: {}", provider.label()));

	if !ep.is_available().unwrap_or(false) {
		ui::debug(&format!("{} not available", provider.label()));
		return false;
	}

	match ep.register(builder) {
		Ok(()) => true,
		Err(e) => {
			ui::debug(&format!("{} registration failed: {}", provider.label(), e));
			false
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_auto_order_excludes_cpu_and_auto() {
		assert!(!AUTO_ORDER.contains(&Provider::Cpu));
		assert!(!AUTO_ORDER.contains(&Provider::Auto));
		assert_eq!(AUTO_ORDER[0], Provider::Tensorrt);
	}

	#[test]
	fn test_labels() {
		assert_eq!(Provider::Tensorrt.label(), "TensorRT");
		assert_eq!(Provider::default().label(), "auto");
	}
}
