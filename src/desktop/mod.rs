//! Native preview of the page: a `three-d` window with an egui overlay.

use std::{
    sync::mpsc::{self, Receiver, Sender},
    time::Duration,
};

use clap::Parser;
use tracing::level_filters::LevelFilter;
use three_d::{
    ClearState, FrameInput, FrameOutput, GUI,
    egui::Context as EguiContext,
    window::{Window, WindowSettings},
};

use crate::{
    app::{Effect, ErrorNotice, Message, Page},
    background::{self, FetchError, ImageDescriptor},
    cfg::{MemoryStore, PlatformStore, PreferenceStore},
    logging,
    site::{self, CONFIG_PATH},
};

mod page;

const FALLBACK_TITLE: &str = "Landing Page";

#[derive(Debug, Parser)]
#[command(about = "Preview a landing page configuration on the desktop")]
pub struct Args {
    /// Configuration document: a file path or an http(s) URL.
    #[arg(long, default_value = CONFIG_PATH)]
    config: String,
    /// Keep preferences in memory only.
    #[arg(long)]
    no_persist: bool,
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

type FetchResult = Result<ImageDescriptor, FetchError>;

struct Program<S> {
    page: Option<Page<S>>,
    /// The banner and the frame time it first appeared at.
    notice: Option<(ErrorNotice, Option<f64>)>,
    fetch_tx: Sender<FetchResult>,
    fetch_rx: Receiver<FetchResult>,
    /// Accumulated frame time (ms) at which the background fades in.
    fade_in_at: Option<f64>,
    now: f64,
}

impl<S: PreferenceStore> Program<S> {
    fn new(config_source: &str, store: S) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::channel();
        let mut program = Self {
            page: None,
            notice: None,
            fetch_tx,
            fetch_rx,
            fade_in_at: None,
            now: 0.0,
        };

        match site::load(config_source) {
            Ok(config) => {
                let mut page = Page::new(config, store, &mut rand::thread_rng());
                let effects = page.start();
                program.page = Some(page);
                program.run_effects(effects);
            }
            Err(e) => program.notice = Some((ErrorNotice::for_startup_failure(&e), None)),
        }
        program
    }

    fn window_title(&self) -> String {
        self.page
            .as_ref()
            .map(|p| p.view().document_title)
            .unwrap_or_else(|| FALLBACK_TITLE.to_owned())
    }

    fn dispatch(&mut self, message: Message) {
        let Some(page) = &mut self.page else {
            return;
        };
        let effects = page.update(message);
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchBackground { api_url } => {
                    let tx = self.fetch_tx.clone();
                    std::thread::spawn(move || {
                        // The receiver only goes away with the window.
                        let _ = tx.send(background::fetch_blocking(&api_url));
                    });
                }
                Effect::FadeInAfter(delay) => self.fade_in_at = Some(self.now + millis(delay)),
            }
        }
    }

    /// Deliver finished fetches and due timers.
    fn poll(&mut self, now: f64) {
        self.now = now;

        while let Ok(result) = self.fetch_rx.try_recv() {
            self.dispatch(Message::BackgroundLoaded(result));
        }

        if self.fade_in_at.is_some_and(|at| at <= now) {
            self.fade_in_at = None;
            self.dispatch(Message::FadeInElapsed);
        }

        if let Some((notice, shown_at)) = &mut self.notice {
            let shown_at = *shown_at.get_or_insert(now);
            if now - shown_at >= millis(notice.duration) {
                self.notice = None;
            }
        }
    }

    fn draw(&mut self, ctx: &EguiContext) {
        let mut messages = Vec::new();
        if let Some(page) = &self.page {
            page::draw(ctx, &page.view(), &mut messages);
        }
        if let Some((notice, _)) = &self.notice {
            page::draw_error_banner(ctx, notice);
        }
        for message in messages {
            self.dispatch(message);
        }
    }

    fn tick(&mut self, gui: &mut GUI, mut frame_input: FrameInput) -> FrameOutput {
        self.poll(frame_input.accumulated_time);

        gui.update(
            &mut frame_input.events,
            frame_input.accumulated_time,
            frame_input.viewport,
            frame_input.device_pixel_ratio,
            |ctx| self.draw(ctx),
        );

        let screen = frame_input.screen();
        let res = screen
            .clear(ClearState::color_and_depth(0.0, 0.0, 0.0, 1.0, 1.0))
            .write(|| gui.render());
        if let Err(e) = res {
            tracing::error!("failed to render frame: {e}");
        }

        FrameOutput::default()
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn new_window(title: String) -> Option<Window> {
    let res = Window::new(WindowSettings {
        title,
        min_size: (320, 240),
        ..Default::default()
    });
    match res {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::error!("Error when creating window: {e}");
            None
        }
    }
}

fn run_program<S: PreferenceStore + 'static>(mut program: Program<S>) {
    let Some(window) = new_window(program.window_title()) else {
        std::process::exit(1);
    };
    let mut gui = GUI::new(&window.gl());
    egui_extras::install_image_loaders(gui.context());

    window.render_loop(move |frame_input| program.tick(&mut gui, frame_input));
}

pub fn run(args: Args) {
    logging::init(args.log_level);

    if args.no_persist {
        run_program(Program::new(&args.config, MemoryStore::default()));
    } else {
        run_program(Program::new(&args.config, PlatformStore));
    }
}
