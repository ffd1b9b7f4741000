use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pysyntax::driver::parse_files;
use pysyntax::{LanguageLevel, ParsingContext, parse_module};
use std::fs;
use tempfile::TempDir;

/// A module touching every statement family, soft keywords included.
fn make_python_file(index: usize) -> String {
    format!(
        r#"
from __future__ import with_statement
import os, sys as system
from os.path import (join, exists as path_exists)

CONSTANT_{i} = {i}
a_{i} = b_{i} = [x * 2 for x in range(10) if x % 2]

@decorator
def function_{i}(x, (y, z)=(1, 2), *args, **kwargs):
    global CONSTANT_{i}
    with open(join("a", "b")) as handle:
        data = handle.read()
    try:
        value = {{"key": data[1:2], "other": lambda q: q or None}}
    except (IOError, OSError), err:
        raise ValueError, err
    else:
        pass
    finally:
        del data
    return x if y else z

class Class_{i}(object):
    def method(self):
        for item, other in self.pairs:
            if item: continue
            elif other: break
            else:
                yield item
        while True:
            print >>system.stderr, "done",
            assert self, `self`
    as_ = with_ = 1

x_{i} += 1; y_{i} = x_{i} ** 2
"#,
        i = index
    )
}

fn bench_parse(c: &mut Criterion) {
    let context = ParsingContext::new(LanguageLevel::Python25);

    let big_source: String = (0..200).map(make_python_file).collect::<Vec<_>>().join("\n");
    c.bench_function("parse_module_single_large_file", |b| {
        b.iter(|| {
            let tree = parse_module(black_box(&big_source), &context);
            black_box(tree);
        });
    });

    let assignments: String = (0..40_000).map(|i| format!("a{i} = {i}\n")).collect();
    c.bench_function("parse_module_40k_assignments", |b| {
        b.iter(|| {
            let tree = parse_module(black_box(&assignments), &context);
            black_box(tree);
        });
    });

    let dir = TempDir::new().unwrap();
    let mut files = Vec::new();
    for i in 0..50 {
        let path = dir.path().join(format!("module_{i}.py"));
        fs::write(&path, make_python_file(i)).unwrap();
        files.push(path);
    }

    c.bench_function("parse_files_50_modules", |b| {
        b.iter(|| {
            let reports = parse_files(black_box(&files), &context).unwrap();
            black_box(reports);
        });
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
