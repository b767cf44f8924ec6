//! Benchmarks for animation tree evaluation.
//!
//! Run with: cargo bench --bench tree_bench

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::Vec3;

use myth_animgraph::animation::{ActorAnimator, AnimationClip, Animator, InterpolationMode, KeyframeTrack, LayerMixer, Track};
use myth_animgraph::nodetree::{AnimationNodeTree, AnimationOutputNode, MixAnimationNode, NodeId, PlayActionNode};

const FPS: f32 = 30.0;
const ROOT: &str = "Root";

fn clip(name: &str) -> Arc<AnimationClip> {
    let track = KeyframeTrack::new(
        vec![0.0, 30.0, 60.0],
        vec![Vec3::ZERO, Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 3.0, 0.0)],
        InterpolationMode::Linear,
    )
    .unwrap();
    Arc::new(AnimationClip::new(name, vec![Track::translation(ROOT, track)]))
}

/// Eight leaves combined pairwise under one output node.
fn balanced_tree() -> AnimationNodeTree {
    let mut tree = AnimationNodeTree::new();
    let mut level: Vec<NodeId> = (0..8)
        .map(|i| {
            let name = format!("Leaf {i}");
            tree.add_node(&name, PlayActionNode::with_clip(clip(&name))).unwrap()
        })
        .collect();

    let mut count = 0;
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                count += 1;
                let mix = tree
                    .add_node(&format!("Mix {count}"), MixAnimationNode::new(0.5, Default::default()).unwrap())
                    .unwrap();
                tree.link(pair[0], mix, 1).unwrap();
                tree.link(pair[1], mix, 2).unwrap();
                mix
            })
            .collect();
    }

    let output = tree.add_node("Output", AnimationOutputNode::new()).unwrap();
    tree.link(level[0], output, 0).unwrap();
    tree
}

fn bench_advance(c: &mut Criterion) {
    let mut tree = balanced_tree();
    let mut animator = ActorAnimator::new(LayerMixer::new(FPS), FPS, Some(ROOT.to_string())).unwrap();
    animator.state_mut().set_time_delta(1.0 / FPS).unwrap();

    c.bench_function("advance_8_leaves", |b| {
        b.iter(|| black_box(tree.advance(&mut animator).unwrap()));
    });
}

fn bench_validate(c: &mut Criterion) {
    let mut tree = balanced_tree();

    c.bench_function("validate_8_leaves", |b| {
        b.iter(|| black_box(tree.validate()));
    });
}

fn bench_mixer_sample(c: &mut Criterion) {
    let mut tree = balanced_tree();
    let mut animator = ActorAnimator::new(LayerMixer::new(FPS), FPS, Some(ROOT.to_string())).unwrap();
    animator.state_mut().set_time_delta(1.0 / FPS).unwrap();
    tree.advance(&mut animator).unwrap();

    let mixer = animator.target_mut();
    c.bench_function("mixer_sample_8_layers", |b| {
        b.iter(|| {
            mixer.update(1.0 / FPS);
            black_box(mixer.sample_translation(ROOT))
        });
    });
}

criterion_group!(benches, bench_advance, bench_validate, bench_mixer_sample);
criterion_main!(benches);
