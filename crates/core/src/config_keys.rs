//! Well-known run configuration keys
//!
//! These are plain strings handed to `RunOptions::add_config_entry`. The
//! engine validates values; nothing here is checked locally.

/// Shrink memory arenas at the end of the run.
///
/// Value is a `;`-separated list of devices, e.g. `"cpu:0;gpu:0"`.
pub const ENABLE_MEMORY_ARENA_SHRINKAGE: &str = "memory.enable_memory_arena_shrinkage";

/// Skip synchronising execution providers with the CPU at the end of the run.
///
/// `"1"` disables synchronisation, `"0"` (default) keeps it.
pub const DISABLE_SYNCHRONIZE_EXECUTION_PROVIDERS: &str =
    "disable_synchronize_execution_providers";

/// Select the captured GPU graph to replay.
///
/// Value is an integer id; `"-1"` skips graph capture for this run.
pub const GPU_GRAPH_ID: &str = "gpu_graph_id";

/// HTP performance mode for the QNN execution provider.
pub const QNN_HTP_PERF_MODE: &str = "qnn.htp_perf_mode";

/// HTP performance mode applied after the run completes.
pub const QNN_HTP_PERF_MODE_POST_RUN: &str = "qnn.htp_perf_mode_post_run";

/// RPC control latency for the QNN execution provider, in microseconds.
pub const QNN_RPC_CONTROL_LATENCY: &str = "qnn.rpc_control_latency";
