//! App shell state: auth context, location history and routing, theme and
//! toasts.  Rendering lives in [`crate::ui`]; this module is UI-agnostic
//! except for [`Theme::apply`].

pub mod auth;
pub mod router;
pub mod theme;
pub mod toast;

pub use auth::{AccessContext, AuthState};
pub use router::{resolve_route, History, Location, Route, RouteDecision};
pub use theme::Theme;
pub use toast::{Toast, ToastKind, Toasts, TOAST_DURATION};
