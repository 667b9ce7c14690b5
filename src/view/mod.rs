mod badge_host;

pub use badge_host::BadgeHostView;
