//! The demo scenes shipped with the gallery, in menu order

pub mod audio_viz;
pub mod brain;
pub mod chart;
mod common;
pub mod farm;
pub mod force_graph;
pub mod noise;
pub mod periodic;
pub mod rubiks;

use crate::scene::SceneFactory;

pub fn catalog() -> Vec<(&'static str, SceneFactory)> {
    vec![
        (audio_viz::NAME, audio_viz::create as SceneFactory),
        (brain::NAME, brain::create as SceneFactory),
        (farm::NAME, farm::create as SceneFactory),
        (periodic::NAME, periodic::create as SceneFactory),
        (force_graph::NAME, force_graph::create as SceneFactory),
        (rubiks::NAME, rubiks::create as SceneFactory),
        (chart::NAME, chart::create as SceneFactory),
        (noise::NAME, noise::create as SceneFactory),
    ]
}
