pub mod auth_gateway;
pub mod bookings;
pub mod notification_poller;
pub mod session;

pub(crate) mod response;

pub use auth_gateway::{AuthGateway, LOCAL_ADMIN_IDENTIFIER, LOCAL_SESSION_TOKEN};
pub use bookings::{BookingsClient, RECENT_BOOKINGS_LIMIT};
pub use notification_poller::{
    badge_label, relevant_notifications, NotificationPoller, PollerHandle, NOTIFICATION_CAP,
};
pub use session::SessionService;
