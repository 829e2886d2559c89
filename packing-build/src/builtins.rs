//! Node.js core module names.

/// Top-level names of the modules shipped with Node.js.
const NODE_BUILTINS: &[&str] = &[
    "_http_agent",
    "_http_client",
    "_http_common",
    "_http_incoming",
    "_http_outgoing",
    "_http_server",
    "_stream_duplex",
    "_stream_passthrough",
    "_stream_readable",
    "_stream_transform",
    "_stream_wrap",
    "_stream_writable",
    "_tls_common",
    "_tls_wrap",
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Check whether a specifier names a Node.js built-in module.
///
/// Accepts the `node:` scheme (always built-in) and subpaths of built-ins
/// such as `fs/promises` or `path/posix`.
pub fn is_builtin_module(specifier: &str) -> bool {
    if specifier.starts_with("node:") {
        return true;
    }
    let top = specifier.split('/').next().unwrap_or(specifier);
    NODE_BUILTINS.binary_search(&top).is_ok()
}
