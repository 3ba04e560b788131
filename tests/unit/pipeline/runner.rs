use super::*;
use crate::{
    chart::scene::ChartScene,
    data::{record::SalesRecord, table::SalesTable},
    encode::sink::InMemorySink,
    render::cpu::CpuBackendOpts,
};

/// Encodes the title and bar count of each scene into a tiny frame.
#[derive(Clone, Default)]
struct MockBackend {
    fail_on_title: Option<String>,
}

impl RenderBackend for MockBackend {
    fn render_scene(&mut self, scene: &ChartScene) -> BarRaceResult<FrameRGBA> {
        if self.fail_on_title.as_deref() == Some(scene.title.text.as_str()) {
            return Err(BarRaceError::render("mock failure"));
        }
        let year: u32 = scene
            .title
            .text
            .rsplit(' ')
            .next()
            .and_then(|y| y.parse().ok())
            .unwrap_or(0);
        let mut data = year.to_le_bytes().to_vec();
        data.extend([scene.bars.len() as u8, 0, 0, 255]);
        Ok(FrameRGBA {
            width: 2,
            height: 1,
            data,
            premultiplied: false,
        })
    }
}

fn small_style() -> ChartStyle {
    ChartStyle {
        width_in: 3.0,
        height_in: 2.0,
        dpi: 40.0,
        ..ChartStyle::default()
    }
}

fn sample_timeline(steps: u32) -> (SalesTable, Timeline) {
    let table = SalesTable::new(vec![
        SalesRecord::new(2000, "A", 100.0),
        SalesRecord::new(2000, "B", 50.0),
        SalesRecord::new(2001, "A", 80.0),
        SalesRecord::new(2001, "B", 90.0),
        SalesRecord::new(2002, "C", 120.0),
        SalesRecord::new(2002, "A", 60.0),
    ])
    .unwrap();
    let timeline = build_timeline(&table, steps).unwrap();
    (table, timeline)
}

fn opts(parallel: bool) -> AnimationOpts {
    AnimationOpts {
        frame_delay_ms: 100,
        loop_mode: LoopMode::Infinite,
        threading: RenderThreading {
            parallel,
            threads: Some(2),
            chunk_size: 3,
        },
    }
}

#[test]
fn sequential_render_pushes_every_frame_in_order() {
    let (table, timeline) = sample_timeline(5);
    let mut sink = InMemorySink::new();
    let stats = render_timeline(
        &timeline,
        table.max_sales(),
        &small_style(),
        &opts(false),
        &MockBackend::default(),
        &mut sink,
    )
    .unwrap();

    assert_eq!(stats.frames_total, 10);
    assert_eq!(stats.max_bars, 3);
    assert!(sink.is_finished());

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (120, 80));
    assert_eq!(cfg.frame_delay_ms, 100);
    assert_eq!(cfg.loop_mode, LoopMode::Infinite);
    assert_eq!(cfg.total_frames, 10);

    let indices: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(indices, (0..10).collect::<Vec<_>>());

    let years: Vec<u32> = sink
        .frames()
        .iter()
        .map(|(_, f)| u32::from_le_bytes([f.data[0], f.data[1], f.data[2], f.data[3]]))
        .collect();
    assert_eq!(
        years,
        vec![2000, 2000, 2000, 2000, 2000, 2001, 2001, 2001, 2001, 2001]
    );

    // 2000->2001 has cars {A, B}; 2001->2002 has {A, B, C}.
    let bars: Vec<u8> = sink.frames().iter().map(|(_, f)| f.data[4]).collect();
    assert_eq!(bars, vec![2, 2, 2, 2, 2, 3, 3, 3, 3, 3]);
}

#[test]
fn parallel_render_matches_sequential_output() {
    let (table, timeline) = sample_timeline(4);
    let backend = CpuBackend::new(
        &CpuBackendOpts {
            system_fonts: false,
            font_dirs: Vec::new(),
        },
        40.0,
    );

    let mut seq = InMemorySink::new();
    render_timeline(
        &timeline,
        table.max_sales(),
        &small_style(),
        &opts(false),
        &backend,
        &mut seq,
    )
    .unwrap();

    let mut par = InMemorySink::new();
    render_timeline(
        &timeline,
        table.max_sales(),
        &small_style(),
        &opts(true),
        &backend,
        &mut par,
    )
    .unwrap();

    assert_eq!(seq.frames().len(), 8);
    assert_eq!(seq.frames(), par.frames());
}

#[test]
fn backend_errors_abort_the_run() {
    let (table, timeline) = sample_timeline(5);
    let backend = MockBackend {
        fail_on_title: Some("Car Sales Ranking - Year 2001".to_string()),
    };

    for parallel in [false, true] {
        let mut sink = InMemorySink::new();
        let err = render_timeline(
            &timeline,
            table.max_sales(),
            &small_style(),
            &opts(parallel),
            &backend,
            &mut sink,
        )
        .unwrap_err();
        assert!(matches!(err, BarRaceError::Render(_)));
        assert!(!sink.is_finished());
        assert!(sink.frames().len() <= 5);
    }
}

#[test]
fn zero_max_sales_is_rejected_before_any_frame() {
    let table = SalesTable::new(vec![
        SalesRecord::new(2000, "A", 0.0),
        SalesRecord::new(2001, "A", 0.0),
    ])
    .unwrap();
    let timeline = build_timeline(&table, 2).unwrap();

    let mut sink = InMemorySink::new();
    let err = render_timeline(
        &timeline,
        table.max_sales(),
        &small_style(),
        &opts(false),
        &MockBackend::default(),
        &mut sink,
    )
    .unwrap_err();
    assert!(matches!(err, BarRaceError::Validation(_)));
    assert!(sink.config().is_none());
}

#[test]
fn animation_opts_follow_the_pipeline_config() {
    let cfg = PipelineConfig {
        frame_delay_ms: 40,
        loop_mode: LoopMode::Finite(1),
        ..PipelineConfig::default()
    };
    let o = AnimationOpts::from(&cfg);
    assert_eq!(o.frame_delay_ms, 40);
    assert_eq!(o.loop_mode, LoopMode::Finite(1));
    assert_eq!(o.threading, cfg.threading);
}
