pub mod qr_badge_renderer;
