use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use typeix_metadata::{
    create_class_decorator, create_method_decorator, create_parameter_and_property_decorator,
    ClassId, Decorator, DesignTypeTable, MetadataRegistry, RawArgs, Site, Target, TypeDescriptor,
};

/// Chain of `depth` classes, each with a constructor parameter, a property
/// and a handler method with two annotated parameters
fn build_chain(depth: usize) -> (MetadataRegistry, ClassId) {
    let types = Arc::new(DesignTypeTable::new());
    let registry = MetadataRegistry::builder().reflector(types.clone()).build();

    let injectable = Decorator::class("Injectable");
    let inject = Decorator::mixed("Inject");
    let handler = Decorator::method("Handler");

    let class_annotation = create_class_decorator(&injectable, RawArgs::None).unwrap();
    let inject_annotation = create_parameter_and_property_decorator(&inject, RawArgs::None).unwrap();
    let handler_annotation =
        create_method_decorator(&handler, RawArgs::named([("path", "/")])).unwrap();

    let mut parent = None;
    let mut last = ClassId(0);
    for level in 0..depth {
        let class = registry
            .define_class(&format!("Service{}", level), parent)
            .unwrap();
        let property = format!("dep{}", level);

        types.declare_constructor(class, vec![TypeDescriptor::Object]);
        types.declare_property(Target::Prototype(class), &property, TypeDescriptor::Object);
        types.declare_method(
            Target::Prototype(class),
            "handle",
            vec![TypeDescriptor::String, TypeDescriptor::Number],
            TypeDescriptor::Void,
        );

        class_annotation.apply(&registry, Site::class(class)).unwrap();
        inject_annotation
            .apply(&registry, Site::constructor_parameter(class, 0))
            .unwrap();
        inject_annotation
            .apply(&registry, Site::property(class, &property))
            .unwrap();
        handler_annotation
            .apply(&registry, Site::method(class, "handle"))
            .unwrap();
        for index in 0..2 {
            inject_annotation
                .apply(&registry, Site::parameter(class, "handle", index))
                .unwrap();
        }

        parent = Some(class);
        last = class;
    }
    (registry, last)
}

fn bench_all_metadata(c: &mut Criterion) {
    let mut group = c.benchmark_group("all_metadata_for_target");

    for depth in [1, 4, 16] {
        let (registry, leaf) = build_chain(depth);
        group.bench_with_input(BenchmarkId::new("depth", depth), &leaf, |b, leaf| {
            b.iter(|| registry.get_all_metadata_for_target(black_box(*leaf)));
        });
    }

    group.finish();
}

fn bench_all_keys(c: &mut Criterion) {
    let (registry, leaf) = build_chain(8);

    c.bench_function("all_metadata_keys_depth_8", |b| {
        b.iter(|| registry.get_all_metadata_keys_for_target(black_box(leaf)));
    });
}

fn bench_has_decorator(c: &mut Criterion) {
    let (registry, leaf) = build_chain(8);
    let missing = Decorator::property("Missing");

    c.bench_function("has_decorator_miss_depth_8", |b| {
        b.iter(|| registry.has_decorator(black_box(&missing), leaf, "dep0"));
    });
}

criterion_group!(benches, bench_all_metadata, bench_all_keys, bench_has_decorator);
criterion_main!(benches);
