use super::*;
use crate::edit::Sign;
use crate::image::ImageMeta;
use crate::render::PreviewRenderer;
use image::{Rgba, RgbaImage};
use proptest::prelude::*;

const LOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Default)]
struct RecordingSurface {
    attached: Vec<(u32, u32)>,
    presented: Vec<(ColorFilter, AffineTransform)>,
}

impl PreviewSurface for RecordingSurface {
    fn attach(&mut self, source: &SourceImage) {
        self.attached
            .push((source.natural_width(), source.natural_height()));
    }

    fn present(&mut self, filter: &ColorFilter, transform: &AffineTransform) {
        self.presented.push((*filter, *transform));
    }
}

#[derive(Default)]
struct VecSink {
    downloads: Vec<Download>,
}

impl DownloadSink for VecSink {
    fn deliver(&mut self, download: Download) {
        self.downloads.push(download);
    }
}

fn decoded(pixels: RgbaImage) -> ImageRequest {
    ImageRequest::Decoded {
        pixels,
        meta: ImageMeta::from_clipboard(None),
    }
}

fn controller() -> Controller<RecordingSurface, VecSink> {
    Controller::new(
        RecordingSurface::default(),
        VecSink::default(),
        &AppConfig::default(),
    )
}

fn loaded(pixels: RgbaImage) -> Controller<RecordingSurface, VecSink> {
    let mut c = controller();
    c.load_image(decoded(pixels));
    c.wait_for_load(LOAD_TIMEOUT)
        .expect("load finished")
        .expect("load succeeded");
    c
}

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            u8::try_from((x * 7 + y * 3) % 256).unwrap_or(0),
            u8::try_from((x * 13) % 256).unwrap_or(0),
            u8::try_from((y * 11) % 256).unwrap_or(0),
            255,
        ])
    })
}

fn last_export(c: &Controller<RecordingSurface, VecSink>) -> RgbaImage {
    let download = c.sink().downloads.last().expect("a download");
    image::load_from_memory_with_format(&download.bytes, image::ImageFormat::Png)
        .expect("decode png")
        .to_rgba8()
}

fn assert_invariants(state: &EditState) {
    for channel in Channel::ALL {
        assert!(state.value(channel) <= channel.max());
    }
    assert_eq!(state.rotate() % 90, 0);
}

#[test]
fn starts_disabled_and_ignores_editing_intents() {
    let mut c = controller();
    assert_eq!(c.selection(), Selection::Disabled);
    assert!(c.slider().is_none());
    for intent in [
        Intent::SelectChannel(Channel::Saturation),
        Intent::SetSliderValue(10),
        Intent::RotateLeft,
        Intent::RotateRight,
        Intent::FlipHorizontal,
        Intent::FlipVertical,
        Intent::Reset,
        Intent::Save,
    ] {
        assert_eq!(c.dispatch(intent).expect("no error"), Dispatch::Ignored);
    }
    assert_eq!(*c.state(), EditState::default());
    assert!(c.preview().presented.is_empty());
}

#[test]
fn save_without_image_produces_no_download() {
    let mut c = controller();
    assert_eq!(c.save().expect("no error"), Dispatch::Ignored);
    assert!(c.sink().downloads.is_empty());
}

#[test]
fn load_enables_editing_and_resets() {
    let c = loaded(gradient(6, 4));
    assert_eq!(c.selection(), Selection::Channel(Channel::Brightness));
    assert_eq!(c.preview().attached, vec![(6, 4)]);
    assert_eq!(c.preview().presented.len(), 1);
    assert_eq!(
        c.slider(),
        Some(SliderModel {
            channel: Channel::Brightness,
            max: 200,
            value: 100,
        })
    );
    assert!(!c.is_loading());
}

#[test]
fn every_mutating_intent_presents() {
    let mut c = loaded(gradient(4, 4));
    let before = c.preview().presented.len();
    c.rotate_right();
    c.flip_v();
    c.set_slider_value(120);
    let (filter, transform) = *c.preview().presented.last().expect("presented");
    assert_eq!(c.preview().presented.len(), before + 3);
    assert_eq!(filter.brightness, 120);
    assert_eq!(transform.to_string(), "rotate(90deg) scale(1, -1)");
}

#[test]
fn selecting_channel_updates_slider_model() {
    let mut c = loaded(gradient(2, 2));
    c.set_slider_value(180);
    c.select_channel(Channel::Inversion);
    let slider = c.slider().expect("enabled");
    assert_eq!(slider.max, 100);
    assert_eq!(slider.value, 0);
    c.set_slider_value(250);
    assert_eq!(c.slider().expect("enabled").label(), "100%");
    c.select_channel(Channel::Brightness);
    assert_eq!(c.slider().expect("enabled").value, 180);
}

#[test]
fn slider_only_changes_selected_channel() {
    let mut c = loaded(gradient(2, 2));
    c.select_channel(Channel::Saturation);
    c.set_slider_value(30);
    let state = c.state();
    assert_eq!(state.saturation(), 30);
    assert_eq!(state.brightness(), 100);
    assert_eq!(state.inversion(), 0);
    assert_eq!(state.gray_scale(), 0);
    assert_eq!(state.rotate(), 0);
}

#[test]
fn slider_values_are_clamped_silently() {
    let mut c = loaded(gradient(2, 2));
    assert_eq!(c.dispatch(Intent::SetSliderValue(-40)).expect("ok"), Dispatch::Applied);
    assert_eq!(c.state().brightness(), 0);
    c.dispatch(Intent::SelectChannel(Channel::GrayScale))
        .expect("ok");
    c.dispatch(Intent::SetSliderValue(9_999)).expect("ok");
    assert_eq!(c.state().gray_scale(), 100);
    assert_invariants(c.state());
}

#[test]
fn flips_and_resets_obey_laws() {
    let mut c = loaded(gradient(3, 3));
    let start = *c.state();
    c.flip_h();
    c.flip_h();
    c.flip_v();
    c.flip_v();
    assert_eq!(*c.state(), start);

    c.rotate_left();
    c.flip_h();
    c.reset();
    let once = *c.state();
    c.reset();
    assert_eq!(*c.state(), once);
    assert_eq!(once, EditState::default());
    assert!(c.source().is_some());
}

#[test]
fn slider_sequence_then_reset_restores_defaults() {
    let mut c = loaded(gradient(8, 8));
    c.set_slider_value(200);
    c.select_channel(Channel::Saturation);
    c.set_slider_value(0);
    c.select_channel(Channel::Inversion);
    c.set_slider_value(100);
    c.reset();
    assert_eq!(*c.state(), EditState::default());
    assert_eq!(c.selection(), Selection::Channel(Channel::Brightness));
}

#[test]
fn grayscale_red_exports_neutral_pixel() {
    let mut c = loaded(RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255])));
    c.select_channel(Channel::GrayScale);
    c.set_slider_value(100);
    assert_eq!(c.save().expect("save"), Dispatch::Applied);
    let download = c.sink().downloads.last().expect("download");
    assert_eq!(download.file_name, "image.png");
    let out = last_export(&c);
    let [r, g, b, a] = out.get_pixel(50, 50).0;
    assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1, "{r} {g} {b}");
    assert_eq!(a, 255);
}

#[test]
fn horizontal_flip_exports_mirror_image() {
    let src = gradient(9, 5);
    let mut c = loaded(src.clone());
    c.flip_h();
    c.save().expect("save");
    assert_eq!(last_export(&c), image::imageops::flip_horizontal(&src));
}

#[test]
fn quarter_turn_keeps_canvas_size_and_centre() {
    let src = RgbaImage::from_fn(200, 100, |x, y| {
        if (90..110).contains(&x) && (40..60).contains(&y) {
            Rgba([0, 0, 255, 255])
        } else {
            Rgba([255, 255, 0, 255])
        }
    });
    let mut c = loaded(src.clone());
    c.rotate_right();
    c.save().expect("save");
    let out = last_export(&c);
    assert_eq!(out.dimensions(), (200, 100));
    assert_eq!(out.get_pixel(100, 50), src.get_pixel(100, 50));
    // Columns outside the turned 100x200 footprint are clipped away.
    assert_eq!(out.get_pixel(10, 50).0[3], 0);
}

#[test]
fn four_right_turns_export_like_none() {
    let mut c = loaded(gradient(16, 16));
    c.save().expect("save");
    let upright = last_export(&c);
    for _ in 0..4 {
        c.rotate_right();
    }
    assert_eq!(c.state().rotate(), 360);
    assert_eq!(c.state().rotate() % 360, 0);
    c.save().expect("save");
    assert_eq!(last_export(&c), upright);
}

#[test]
fn superseded_load_is_ignored() {
    let mut c = controller();
    let image_a = RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 255]));
    let image_b = RgbaImage::from_pixel(5, 2, Rgba([0, 255, 0, 255]));
    let gen_a = c.load_image(decoded(image_a.clone()));
    let gen_b = c.load_image(decoded(image_b.clone()));
    assert!(gen_b > gen_a);

    let applied = c
        .complete_load(
            LoadCompletion {
                generation: gen_b,
                result: Ok(SourceImage::new(image_b, ImageMeta::from_clipboard(None))),
            },
            "b",
        )
        .expect("b ok");
    assert!(applied.is_some());

    let stale = c
        .complete_load(
            LoadCompletion {
                generation: gen_a,
                result: Ok(SourceImage::new(image_a, ImageMeta::from_clipboard(None))),
            },
            "a",
        )
        .expect("stale is not an error");
    assert!(stale.is_none());
    assert_eq!(c.preview().attached, vec![(5, 2)]);
    assert_eq!(c.source().map(SourceImage::natural_width), Some(5));
}

#[test]
fn second_load_wins_through_worker_threads() {
    let mut c = controller();
    c.load_image(decoded(RgbaImage::from_pixel(3, 3, Rgba([1, 1, 1, 255]))));
    c.load_image(decoded(RgbaImage::from_pixel(7, 1, Rgba([2, 2, 2, 255]))));
    let done = c
        .wait_for_load(LOAD_TIMEOUT)
        .expect("finished")
        .expect("decoded");
    assert_eq!((done.width, done.height), (7, 1));
    assert_eq!(c.preview().attached, vec![(7, 1)]);
    assert!(c.poll_loads().is_none());
}

#[test]
fn decode_failure_keeps_previous_session() {
    let mut c = loaded(gradient(4, 4));
    c.rotate_right();
    let before = *c.state();
    c.load_image(ImageRequest::Bytes {
        name: Some("broken.png".to_string()),
        bytes: b"definitely not an image".to_vec(),
    });
    let err = c
        .wait_for_load(LOAD_TIMEOUT)
        .expect("finished")
        .expect_err("decode must fail");
    assert!(matches!(err, EditorError::Decode { ref source_name, .. } if source_name == "broken.png"));
    assert_eq!(*c.state(), before);
    assert_eq!(c.source().map(SourceImage::natural_width), Some(4));
}

#[test]
fn decode_failure_before_first_image_stays_disabled() {
    let mut c = controller();
    c.load_image(ImageRequest::Bytes {
        name: None,
        bytes: vec![0; 16],
    });
    assert!(c.wait_for_load(LOAD_TIMEOUT).expect("finished").is_err());
    assert_eq!(c.selection(), Selection::Disabled);
}

#[test]
fn preview_and_export_colours_agree() {
    let ctx = egui::Context::default();
    let mut c = Controller::new(
        PreviewRenderer::new(&ctx),
        VecSink::default(),
        &AppConfig::default(),
    );
    c.load_image(decoded(RgbaImage::from_pixel(1, 1, Rgba([180, 90, 40, 255]))));
    c.wait_for_load(LOAD_TIMEOUT)
        .expect("finished")
        .expect("decoded");
    for (channel, value) in [
        (Channel::Brightness, 130),
        (Channel::Saturation, 40),
        (Channel::Inversion, 20),
        (Channel::GrayScale, 30),
    ] {
        c.select_channel(channel);
        c.set_slider_value(value);
    }
    c.flip_h();
    c.save().expect("save");

    let download = c.sink().downloads.last().expect("download");
    let exported = image::load_from_memory_with_format(&download.bytes, image::ImageFormat::Png)
        .expect("decode")
        .to_rgba8();
    let preview = c.preview().pixel(0, 0).expect("preview pixel");
    let export = exported.get_pixel(0, 0).0;
    for (p, e) in preview.iter().zip(export) {
        assert!(p.abs_diff(e) <= 1, "preview {preview:?} export {export:?}");
    }
    assert_eq!(c.preview().baked_filter(), Some(c.descriptors().0));
}

#[test]
fn export_name_comes_from_config() {
    let mut config = AppConfig::default();
    config.export.file_name = "edited".to_string();
    let mut c = Controller::new(RecordingSurface::default(), VecSink::default(), &config);
    c.load_image(decoded(gradient(2, 2)));
    c.wait_for_load(LOAD_TIMEOUT)
        .expect("finished")
        .expect("decoded");
    c.save().expect("save");
    assert_eq!(c.sink().downloads[0].file_name, "edited.png");
}

#[test]
fn mirror_state_reaches_descriptors() {
    let mut c = loaded(gradient(2, 2));
    c.flip_h();
    let (_, transform) = c.descriptors();
    assert_eq!(transform.scale_x, Sign::Negative);
    assert_eq!(transform.scale_y, Sign::Positive);
}

#[test]
fn vanished_worker_reports_disconnect_and_keeps_session() {
    let mut c = loaded(gradient(4, 4));
    c.flip_v();
    let before = *c.state();
    c.pending = Some(PendingLoad::detached(c.generation + 1, "lost.png"));
    assert!(c.is_loading());

    let err = c
        .poll_loads()
        .expect("disconnect is reported")
        .expect_err("no image arrives");
    assert!(
        matches!(err, EditorError::LoaderDisconnected { ref source_name } if source_name == "lost.png")
    );
    assert!(!c.is_loading());
    assert_eq!(*c.state(), before);
    assert_eq!(c.preview().attached, vec![(4, 4)]);
    assert_eq!(c.selection(), Selection::Channel(Channel::Brightness));
}

#[test]
fn encode_failure_leaves_state_and_sink_untouched() {
    let mut c = controller();
    let generation = c.load_image(decoded(RgbaImage::new(1, 1)));
    c.complete_load(
        LoadCompletion {
            generation,
            result: Ok(SourceImage::new(
                RgbaImage::new(0, 0),
                ImageMeta::from_clipboard(None),
            )),
        },
        "empty",
    )
    .expect("applied")
    .expect("latest generation");
    c.select_channel(Channel::Inversion);
    let before = *c.state();

    let err = c.save().expect_err("empty canvas cannot be encoded");
    assert!(matches!(err, EditorError::Encode(_)));
    assert_eq!(*c.state(), before);
    assert!(c.sink().downloads.is_empty());
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Select(Channel),
    Slide(i32),
    RotateLeft,
    RotateRight,
    FlipHorizontal,
    FlipVertical,
    Reset,
}

impl Step {
    const fn intent(self) -> Intent {
        match self {
            Self::Select(channel) => Intent::SelectChannel(channel),
            Self::Slide(value) => Intent::SetSliderValue(value),
            Self::RotateLeft => Intent::RotateLeft,
            Self::RotateRight => Intent::RotateRight,
            Self::FlipHorizontal => Intent::FlipHorizontal,
            Self::FlipVertical => Intent::FlipVertical,
            Self::Reset => Intent::Reset,
        }
    }
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        proptest::sample::select(Channel::ALL.to_vec()).prop_map(Step::Select),
        (-300i32..300).prop_map(Step::Slide),
        Just(Step::RotateLeft),
        Just(Step::RotateRight),
        Just(Step::FlipHorizontal),
        Just(Step::FlipVertical),
        Just(Step::Reset),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn dispatched_intents_keep_state_valid(steps in proptest::collection::vec(step(), 0..48)) {
        let mut c = loaded(gradient(3, 2));
        let mut presents = c.preview().presented.len();
        for step in steps {
            let before = *c.state();
            prop_assert_eq!(c.dispatch(step.intent()).expect("editing never fails"), Dispatch::Applied);
            presents += 1;
            prop_assert_eq!(c.preview().presented.len(), presents);
            prop_assert_eq!(c.preview().presented.last().copied(), Some(c.descriptors()));

            let state = *c.state();
            assert_invariants(&state);
            match step {
                Step::Slide(value) => {
                    let selected = state.selected();
                    prop_assert_eq!(state.value(selected), selected.clamp(value));
                    for channel in Channel::ALL.into_iter().filter(|&ch| ch != selected) {
                        prop_assert_eq!(state.value(channel), before.value(channel));
                    }
                }
                Step::Reset => prop_assert_eq!(state, EditState::default()),
                _ => {}
            }
            prop_assert_eq!(c.slider().map(|s| s.value), Some(state.value(state.selected())));
        }
    }
}

