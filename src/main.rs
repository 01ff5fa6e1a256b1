// What you SEE:
// • A dark starfield page with a glowing glass "Get Started" pill in the middle.
// • Move the mouse over it: light follows the cursor along the rim and inside the glass.
// • Camera mode (switch under the button, or the C key): your mirrored webcam
//   shows through the glass. No camera / permission denied → it just stays dark.
// • Click the pill: it squishes and logs "Clicked!". ESC quits.

use clap::Parser;
use cosmic_button::camera::NokhwaHost;
use cosmic_button::config::Config;
use cosmic_button::draw::Drawer;
use cosmic_button::error::Error;
use cosmic_button::page::{Input, Page};
use cosmic_button::types::FrameBuffer;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = Config::parse();
    let (w, h) = (cfg.width as usize, cfg.height as usize);

    /* --- Window + page setup ---
       Visual: window opens; the camera (if on) appears a moment later. */
    let mut drawer = Drawer::new("Cosmic Button", w, h)?;
    info!("window open at {}x{}", w, h);

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let host = NokhwaHost::new(cfg.camera_index, cfg.capture_width, cfg.capture_height);
    let on_click = Box::new(|| info!("Clicked!"));
    let mut page = Page::new(host, (w, h), &cfg.label, !cfg.camera_off, on_click, &mut rng);

    // The image you actually see each frame.
    let mut screen = FrameBuffer::new(w, h, 0);
    let mut last_frame_time = Instant::now();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32(); // drives fades, twinkles, sparkles
        last_frame_time = now;

        // 1) Input → page (pointer, clicks, camera toggle)
        page.handle_input(Input {
            pointer: drawer.mouse_pos(),
            clicked: drawer.left_clicked(),
            toggle_key: drawer.c_pressed_once(),
        });

        // 2) Settle camera requests, step animations
        page.update(dt);

        // 3) Draw and present
        page.render(&mut screen);
        drawer.present(&screen)?;
    }

    // Dropping the page tears the button down, which releases the camera.
    drop(page);
    info!("bye");
    Ok(())
}
