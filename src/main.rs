use game::{input_from_keys, Game, MINIMAP_SIZE};
use gridcast::Level;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod game;

const DEFAULT_LEVEL: &str = "levels/demo.lvl";

// helper trait to convert strings into std::error types
trait StringToAnyhow<T> {
    fn ah(self) -> anyhow::Result<T>;
}

impl<T> StringToAnyhow<T> for Result<T, String> {
    fn ah(self) -> anyhow::Result<T> {
        self.map_err(|err| anyhow::anyhow!("{err}"))
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("GRIDCAST_LOG");

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| DEFAULT_LEVEL.into());
    let level = Level::load(&path)?;
    let settings = level.settings();
    let width = MINIMAP_SIZE + settings.viewport_width;
    let height = MINIMAP_SIZE.max(settings.viewport_height);

    // sdl boilerplate
    log::info!("initializing sdl2");
    let sdl_ctx = sdl2::init().ah()?;
    log::info!("initializing video");
    let video = sdl_ctx.video().ah()?;

    log::info!("initializing window");
    let mut window = video
        .window("Raycast Demo", width, height)
        .position_centered()
        .build()?;
    window.set_resizable(false);
    log::info!("creating canvas");
    let canvas = window.into_canvas().build()?;
    log::info!("pumping events");
    let mut events = sdl_ctx.event_pump().ah()?;

    let mut keys = HashSet::new();

    log::info!("initializing game state");
    let mut game = Game::new(canvas, level)?;

    let delta = Duration::from_millis(game.settings.frame_millis());
    let mut last_tick = Instant::now();

    'main_loop: loop {
        let prev = Instant::now();

        // handle events
        for ev in events.poll_iter() {
            match ev {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'main_loop,
                Event::KeyDown {
                    keycode: Some(k),
                    repeat,
                    ..
                } => {
                    keys.insert(k);
                    if !repeat {
                        game.key_once(k);
                    }
                }
                Event::KeyUp {
                    keycode: Some(k), ..
                } => {
                    keys.remove(&k);
                }
                _ => {}
            }
        }

        let now = Instant::now();
        game.tick(&input_from_keys(&keys), (now - last_tick).as_secs_f32());
        last_tick = now;

        if let Err(err) = game.draw() {
            log::error!("error while drawing frame: {err}");
            Err(err)?;
        }
        game.canvas.present();

        let diff = Instant::now() - prev;
        if diff < delta {
            std::thread::sleep(delta - diff);
        }
    }

    Ok(())
}
