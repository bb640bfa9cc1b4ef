/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - hand the authenticated identity (AuthCtx) to handlers
 * - axum-specific code in core, the plain type in types
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use self::types::AuthCtx;
