use crate::camera::Camera;
use crate::light::{Color, Light};
use crate::map::{Grid, AIR, WALL};
use crate::settings::{Fog, Settings};
use crate::Point;
use anyhow::Context;
use glam::Vec2;
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;

const SPAWN: char = '*';

/// A setting carried in a level's meta header.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Meta {
    Fov(f32),
    ViewDistance(u32),
    Fog(Fog),
    Sky(Color),
    Ground(Color),
    Ambient(f32),
}

impl Meta {
    /// apply a render setting; camera metas are left alone
    pub fn apply(&self, settings: &mut Settings) {
        match *self {
            Meta::Fog(fog) => settings.fog = Some(fog),
            Meta::Sky(color) => settings.sky = color,
            Meta::Ground(color) => settings.ground = color,
            Meta::Ambient(level) => settings.ambient = Light::splat(level),
            Meta::Fov(_) | Meta::ViewDistance(_) => {}
        }
    }

    /// apply a camera setting; render metas are left alone
    pub fn apply_camera(&self, camera: &mut Camera) {
        match *self {
            Meta::Fov(degrees) => camera.fov = degrees,
            Meta::ViewDistance(distance) => camera.view_distance = distance,
            _ => {}
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Level {
    pub grid: Grid,
    /// centre of the `*` cell, if the level has one
    pub spawn: Option<Point>,
    pub meta: Vec<Meta>,
}

fn tile_id(tile: char) -> u32 {
    match tile {
        ' ' | '0' | SPAWN => AIR,
        '1' => WALL,
        digit if digit.is_ascii_digit() => digit as u32 - '0' as u32,
        other => other as u32,
    }
}

impl Level {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        log::info!("loading level at {}", path.display());
        let file = read_to_string(path)
            .with_context(|| format!("could not read level {}", path.display()))?;
        Self::parse(&file)
    }

    /// Parse level text. Without a `!!!!META` header the whole text is the grid.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut lines = text.lines().peekable();
        let mut meta = vec![];

        if lines.peek().map(|line| line.trim_end()) == Some("!!!!META") {
            lines.next();
            meta = Self::parse_meta(&mut lines)?;
            match lines.by_ref().find(|line| !line.trim().is_empty()) {
                Some(line) if line.trim_end() == "!!!!MAIN" => {}
                Some(other) => anyhow::bail!("unrecognized directive: {other}"),
                None => anyhow::bail!("level has no !!!!MAIN section"),
            }
        }

        let (grid, spawn) = Self::parse_main(lines)?;
        if spawn.is_none() {
            log::warn!("level has no {SPAWN} spawn point");
        }

        Ok(Self { grid, spawn, meta })
    }

    fn parse_meta<'lines>(
        mut lines: impl Iterator<Item = &'lines str>,
    ) -> anyhow::Result<Vec<Meta>> {
        let mut meta = vec![];
        for line in lines.by_ref() {
            if line.trim().is_empty() {
                break;
            }

            let mut chunks = line.trim().split(',');
            let directive = chunks.by_ref().next().unwrap_or_default();
            let params = chunks
                .map(|param| param.split_once('='))
                .collect::<Option<HashMap<_, _>>>()
                .context("incorrectly formatted meta")?;
            let param = |key: &str| {
                params
                    .get(key)
                    .copied()
                    .with_context(|| format!("{directive} needs a {key} parameter"))
            };

            meta.push(match directive {
                "fov" => Meta::Fov(param("degrees")?.parse()?),
                "view" => Meta::ViewDistance(param("distance")?.parse()?),
                "fog" => Meta::Fog(Fog {
                    distance: params.get("distance").unwrap_or(&"12").parse()?,
                    color: Color::from_hex(params.get("color").unwrap_or(&"#000000"))?,
                }),
                "sky" => Meta::Sky(Color::from_hex(param("color")?)?),
                "ground" => Meta::Ground(Color::from_hex(param("color")?)?),
                "ambient" => Meta::Ambient(param("level")?.parse()?),
                other => anyhow::bail!("unrecognized meta directive: {other}"),
            });
        }

        Ok(meta)
    }

    fn parse_main<'lines>(
        lines: impl Iterator<Item = &'lines str>,
    ) -> anyhow::Result<(Grid, Option<Point>)> {
        // spaces are air, so only blank lines around the grid are dropped
        let blank = |line: &&str| line.trim().is_empty();
        let mut rows = lines
            .map(|line| line.trim_end_matches('\r'))
            .skip_while(blank)
            .collect::<Vec<_>>();
        while rows.last().is_some_and(blank) {
            rows.pop();
        }
        // the last line of the text is the southmost row
        rows.reverse();

        let mut spawn = None;
        for (row, line) in rows.iter().enumerate() {
            for (col, _) in line.chars().enumerate().filter(|(_, c)| *c == SPAWN) {
                if spawn.is_some() {
                    anyhow::bail!("more than one spawn in level");
                }
                spawn = Some(Vec2::new(col as f32 + 0.5, row as f32 + 0.5));
            }
        }

        let ids = rows
            .iter()
            .map(|line| line.chars().map(tile_id).collect())
            .collect();
        let grid = Grid::new(ids).context("invalid level grid")?;

        Ok((grid, spawn))
    }

    /// default settings with this level's meta applied
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        for meta in &self.meta {
            meta.apply(&mut settings);
        }
        settings
    }

    /// Where the camera starts: the spawn, or else the centre of the first
    /// open tile.
    pub fn start(&self) -> anyhow::Result<Point> {
        if let Some(spawn) = self.spawn {
            return Ok(spawn);
        }
        let tile = self
            .grid
            .tiles()
            .find(|tile| !tile.is_solid())
            .context("level has no open tile to start in")?;
        log::info!("no spawn in level, starting at tile {},{}", tile.col, tile.row);
        Ok(Vec2::new(tile.col as f32 + 0.5, tile.row as f32 + 0.5))
    }

    /// a camera at `position` facing east, with this level's camera meta
    pub fn camera(&self, position: Point) -> Camera {
        let mut camera = Camera::new(position, 0.);
        for meta in &self.meta {
            meta.apply_camera(&mut camera);
        }
        camera
    }
}
