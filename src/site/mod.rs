// src/site/mod.rs
// =============================================================================
// This module drives the external tools that produce the static site.
//
// Currently wraps:
// - esbuild: bundles src/main.ts into the theme's static JS
// - hugo: renders the site into public/
//
// Both tools are treated as black boxes: we pass arguments, stream their
// output straight to the terminal, and fail if they exit non-zero.
// =============================================================================

mod build;

pub use build::SiteBuild;
