use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use kintree::config::LayoutConfig;
use kintree::ir::{
    RawFamilyMember, RawFamilyRelation, RawMemberData, RelationType, Sex,
    build_family_and_relations,
};
use kintree::layout::compute_layout;
use kintree::render::render_svg;
use kintree::theme::Theme;
use std::hint::black_box;

fn member(id: &str, sex: Sex) -> RawFamilyMember {
    RawFamilyMember {
        id: id.to_string(),
        data: RawMemberData {
            badges: Vec::new(),
            sex,
            subtitles: vec!["1900-1980".to_string()],
            title: format!("Member {id}"),
            title_bg_color: "#2F5D8A".to_string(),
            title_text_color: "#FFFFFF".to_string(),
            image_url: None,
        },
    }
}

fn partner(a: &str, b: &str) -> RawFamilyRelation {
    RawFamilyRelation {
        from_id: a.to_string(),
        to_id: b.to_string(),
        relation_type: RelationType::Married,
        pretty_type: "married".to_string(),
        is_inner_family: false,
    }
}

fn child(parent: &str, child: &str) -> RawFamilyRelation {
    RawFamilyRelation {
        from_id: parent.to_string(),
        to_id: child.to_string(),
        relation_type: RelationType::Child,
        pretty_type: "child".to_string(),
        is_inner_family: true,
    }
}

/// Full binary family: every couple has two children, each child marries a
/// spouse and founds a couple of the next generation.
fn synthetic_family(generations: usize) -> (Vec<RawFamilyMember>, Vec<RawFamilyRelation>) {
    let mut members = Vec::new();
    let mut relations = Vec::new();
    let mut counter = 0usize;
    let mut fresh = |members: &mut Vec<RawFamilyMember>, sex: Sex| {
        let id = format!("m{counter}");
        counter += 1;
        members.push(member(&id, sex));
        id
    };

    let root_a = fresh(&mut members, Sex::F);
    let root_b = fresh(&mut members, Sex::M);
    relations.push(partner(&root_a, &root_b));
    let mut couples = vec![(root_a, root_b)];

    for _ in 1..generations {
        let mut next = Vec::new();
        for (wife, _husband) in &couples {
            for side in 0..2 {
                let descendant = fresh(
                    &mut members,
                    if side == 0 { Sex::F } else { Sex::M },
                );
                let spouse = fresh(
                    &mut members,
                    if side == 0 { Sex::M } else { Sex::F },
                );
                relations.push(child(wife, &descendant));
                relations.push(partner(&descendant, &spouse));
                next.push((descendant, spouse));
            }
        }
        couples = next;
    }

    (members, relations)
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for generations in [3usize, 4, 5] {
        let (raw_members, raw_relations) = synthetic_family(generations);
        let (members, relations) = build_family_and_relations(&raw_members, &raw_relations);
        let theme = Theme::modern();
        let config = LayoutConfig::default();
        group.bench_with_input(
            BenchmarkId::from_parameter(generations),
            &generations,
            |b, _| {
                b.iter(|| {
                    black_box(compute_layout(
                        black_box(&members),
                        black_box(&relations),
                        Some("m0"),
                        &theme,
                        &config,
                    ))
                })
            },
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for generations in [3usize, 4] {
        let (raw_members, raw_relations) = synthetic_family(generations);
        let (members, relations) = build_family_and_relations(&raw_members, &raw_relations);
        let theme = Theme::modern();
        let config = LayoutConfig::default();
        let layout = compute_layout(&members, &relations, Some("m0"), &theme, &config);
        group.bench_with_input(
            BenchmarkId::from_parameter(generations),
            &generations,
            |b, _| b.iter(|| black_box(render_svg(black_box(&layout), &theme, &config))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_render);
criterion_main!(benches);
