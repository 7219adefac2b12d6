use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use qsoentry::{
    core::{
        controller::EntryController,
        effect::InputEvent,
        fields::EntryLayout,
        validator,
    },
    types::{FieldId, KeyCode},
};

fn controller(labels: &[&str]) -> EntryController {
    EntryController::new(
        EntryLayout::free_field(labels.iter().copied()).expect("layout"),
        "Sequence: 1",
    )
    .expect("controller")
}

fn bench_classify(c: &mut Criterion) {
    let calls: Vec<String> = (0..10_000u64)
        .map(|i| {
            if i % 7 == 0 {
                format!("K{i}/P")
            } else {
                format!("W{i}AW")
            }
        })
        .collect();
    c.bench_function("classify_10k", |b| {
        b.iter(|| {
            for call in &calls {
                let _ = validator::classify(call);
            }
        });
    });
}

fn bench_call_sign_typing(c: &mut Criterion) {
    c.bench_function("keystrokes_call_sign_10k", |b| {
        b.iter(|| {
            let mut entry = controller(&["RST", "NR"]);
            let mut text = String::new();
            for i in 0..10_000u32 {
                if text.len() >= 8 {
                    text.clear();
                }
                text.push(char::from(b'A' + (i % 26) as u8));
                let _ = entry.handle_input(InputEvent::KeyUp {
                    field: Some(FieldId::CallSign),
                    key: KeyCode(65),
                    text: text.clone(),
                });
            }
        });
    });
}

fn bench_submissions(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_contacts");
    for fields in [2usize, 5usize] {
        let labels: Vec<&str> = ["RST", "NR", "ST", "ZN", "PWR"][..fields].to_vec();
        let last = FieldId::Field(fields as u8);
        group.bench_with_input(BenchmarkId::from_parameter(fields), &labels, |b, labels| {
            b.iter(|| {
                let mut entry = controller(labels);
                for i in 0..1_000u32 {
                    let _ = entry.handle_input(InputEvent::KeyUp {
                        field: Some(FieldId::CallSign),
                        key: KeyCode(65),
                        text: format!("K{i}ABC"),
                    });
                    let _ = entry.handle_input(InputEvent::FocusIn {
                        field: FieldId::Field(1),
                    });
                    let _ = entry.handle_input(InputEvent::KeyUp {
                        field: Some(last),
                        key: KeyCode::ENTER,
                        text: "05".to_string(),
                    });
                }
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_classify,
    bench_call_sign_typing,
    bench_submissions
);
criterion_main!(benches);
