//! Single-page client: page state, dispatcher calls, and rendering.

pub mod api;
pub mod controller;
pub mod page;
pub mod state;
pub mod surface;
pub mod transport;
pub mod view;

pub use api::{ApiClient, ClientError};
pub use controller::{AlertKind, Controller, Form, Surface};
pub use page::{AuthForm, Page, Region};
pub use state::ClientState;
pub use surface::HtmlSurface;
pub use transport::{HttpTransport, InProcessTransport, Transport};
