//! Session identity and anti-forgery tokens.
//!
//! Sessions are anonymous: the middleware hands every browser an opaque id in a
//! cookie, and tokens are bound to that id so a token minted for one session
//! never validates in another.

pub mod session;
pub mod token;

pub use session::{session_layer, SessionConfig, SessionId};
pub use token::{KeyedTokenIssuer, TokenIssuer};
