/*!
 * Authenticated principal extractor
 *
 * Public API:
 * - CurrentPrincipal
 */

mod core;

pub use core::CurrentPrincipal;
