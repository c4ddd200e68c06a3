use crate::StringToAnyhow;
use gridcast::projection::{self, Fan};
use gridcast::{Camera, Grid, Input, Level, Settings};
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::Canvas;
use sdl2::video::Window;
use std::collections::HashSet;

/// pixels of the left-hand minimap section
pub(crate) const MINIMAP_SIZE: u32 = 600;

/// every n-th ray is drawn on the minimap unless debugging
const MINIMAP_RAY_STRIDE: usize = 8;

fn sdl_color(color: gridcast::Color) -> Color {
    Color::RGB(color.r, color.g, color.b)
}

/// map held keys onto camera input
pub(crate) fn input_from_keys(keys: &HashSet<Keycode>) -> Input {
    Input {
        forward: keys.contains(&Keycode::W),
        back: keys.contains(&Keycode::S),
        turn_left: keys.contains(&Keycode::A),
        turn_right: keys.contains(&Keycode::D),
        look_up: keys.contains(&Keycode::Equals),
        look_down: keys.contains(&Keycode::Minus),
        sprint: keys.contains(&Keycode::LShift),
        fine: keys.contains(&Keycode::LCtrl),
    }
}

pub(crate) struct Game {
    grid: Grid,
    camera: Camera,
    pub settings: Settings,
    pub debug: bool,
    pub canvas: Canvas<Window>,
}

impl Game {
    pub fn new(canvas: Canvas<Window>, level: Level) -> anyhow::Result<Self> {
        let camera = level.camera(level.start()?);

        Ok(Self {
            settings: level.settings(),
            grid: level.grid,
            camera,
            debug: false,
            canvas,
        })
    }

    /// handle a key press that should not repeat
    pub fn key_once(&mut self, key: Keycode) {
        if key == Keycode::Period {
            self.debug = !self.debug;
            log::info!("debug overlay {}", if self.debug { "on" } else { "off" });
        }
    }

    /// apply held keys and integrate the camera
    pub fn tick(&mut self, input: &Input, dt: f32) {
        self.camera.steer(input);
        self.camera.update_within(&self.grid, dt);
    }

    pub fn draw(&mut self) -> anyhow::Result<()> {
        let fan = projection::cast_fan(
            &self.grid,
            &self.camera,
            self.settings.ray_count,
            self.camera.fov,
            self.settings.ambient,
        );

        if let Some(ahead) = fan.rays.get(fan.rays.len() / 2).filter(|_| self.debug) {
            log::debug!(
                "pos {:?} heading {:.1} look {:.0}; ahead {:?} at {:.2} ({:?})",
                self.camera.position,
                self.camera.heading.rem_euclid(360.),
                self.camera.look,
                ahead.tile.map(|t| (t.col, t.row)),
                ahead.distance,
                ahead.side,
            );
        }

        self.canvas.set_draw_color(Color::BLACK);
        self.canvas.clear();
        self.draw_minimap(&fan)?;
        self.draw_view(&fan)?;

        Ok(())
    }

    fn draw_minimap(&mut self, fan: &Fan) -> anyhow::Result<()> {
        // shrink the map if it would not fit its section
        let fit = MINIMAP_SIZE as f32 / self.grid.width().max(self.grid.height()) as f32;
        let scale = self.settings.minimap_scale.min(fit);
        let map = projection::minimap(&self.grid, fan, &self.camera, scale);

        for cell in &map.cells {
            self.canvas.set_draw_color(sdl_color(cell.color));
            self.canvas
                .fill_rect(Rect::new(
                    cell.corner.x as i32,
                    cell.corner.y as i32,
                    cell.size.ceil() as u32,
                    cell.size.ceil() as u32,
                ))
                .ah()?;
        }

        let stride = if self.debug { 1 } else { MINIMAP_RAY_STRIDE };
        for segment in map.rays.iter().step_by(stride) {
            self.canvas.set_draw_color(if segment.hit {
                Color::GREEN
            } else {
                Color::GREY
            });
            self.canvas
                .draw_line(
                    Point::new(segment.from.x as i32, segment.from.y as i32),
                    Point::new(segment.to.x as i32, segment.to.y as i32),
                )
                .ah()?;
        }

        self.canvas.set_draw_color(Color::RED);
        self.canvas
            .draw_line(
                Point::new(map.camera.x as i32, map.camera.y as i32),
                Point::new(map.heading_tip.x as i32, map.heading_tip.y as i32),
            )
            .ah()?;
        self.canvas
            .fill_rect(Rect::new(map.camera.x as i32 - 2, map.camera.y as i32 - 2, 5, 5))
            .ah()?;

        Ok(())
    }

    fn draw_view(&mut self, fan: &Fan) -> anyhow::Result<()> {
        let frame = projection::project(fan, &self.camera, &self.settings);
        let left = MINIMAP_SIZE as i32;
        let width = self.settings.viewport_width;
        let height = self.settings.viewport_height as f32;

        // DRAW SKY AND GROUND
        for band in [frame.sky, frame.ground] {
            if band.bottom > band.top {
                self.canvas.set_draw_color(sdl_color(band.color));
                self.canvas
                    .fill_rect(Rect::new(
                        left,
                        band.top as i32,
                        width,
                        (band.bottom - band.top).ceil() as u32,
                    ))
                    .ah()?;
            }
        }

        // DRAW WALLS
        for column in &frame.columns {
            let Some(color) = column.color else {
                continue;
            };
            let top = column.top.clamp(0., height);
            let bottom = column.bottom.clamp(0., height);
            if bottom <= top {
                continue;
            }

            self.canvas.set_draw_color(sdl_color(color));
            self.canvas
                .fill_rect(Rect::new(
                    left + column.x as i32,
                    top as i32,
                    column.width.ceil().max(1.) as u32,
                    (bottom - top).ceil() as u32,
                ))
                .ah()?;
        }

        Ok(())
    }
}
