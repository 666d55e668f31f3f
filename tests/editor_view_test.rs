// Editing surface behavior: placeholders, resize, validation, errors, reset

use comment_editor_wasm::error::Result;
use comment_editor_wasm::models::{EditorConfig, Field, PostData, SurfaceState};
use comment_editor_wasm::view::{
    EditorView, KeyOutcome, KeyPress, MemorySurface, SubmitOutcome, SubmitPolicy, Surface,
};

#[derive(Default)]
struct RecordingPolicy {
    posts: Vec<PostData>,
}

impl SubmitPolicy for RecordingPolicy {
    fn send_post(&mut self, post: PostData) -> Result<()> {
        self.posts.push(post);
        Ok(())
    }
}

fn rendered(surface: MemorySurface, config: EditorConfig) -> EditorView<MemorySurface> {
    let mut view = EditorView::new(surface, config);
    view.render().expect("render should succeed");
    view
}

fn editor() -> EditorView<MemorySurface> {
    rendered(MemorySurface::new(), EditorConfig::default())
}

fn titled_editor(surface: MemorySurface) -> EditorView<MemorySurface> {
    let config = EditorConfig {
        show_title: true,
        ..EditorConfig::default()
    };
    rendered(surface, config)
}

fn type_body(view: &mut EditorView<MemorySurface>, text: &str) {
    view.surface_mut().set_value(Field::Body, text);
}

#[test]
fn test_renders_post_button_without_title() {
    let view = editor();
    let context = view.surface().last_context().expect("rendered once");

    assert_eq!(context.strings.post, "Post");
    assert!(!context.show_title);
    assert!(!view.surface().has_field(Field::Title));
}

#[test]
fn test_post_click_sends_valid_post() {
    let mut view = editor();
    let mut policy = RecordingPolicy::default();
    type_body(&mut view, "test");

    assert_eq!(view.submit(&mut policy).unwrap(), SubmitOutcome::Submitted);
    assert_eq!(policy.posts.len(), 1);
    assert_eq!(policy.posts[0].body, "<p>test</p>");
    assert!(policy.posts[0].title.is_none());
}

#[test]
fn test_enter_requests_submit_and_shift_enter_does_not() {
    let mut view = editor();
    type_body(&mut view, "hi");

    assert_eq!(view.handle_keydown(&KeyPress::enter()), KeyOutcome::Submit);
    assert_eq!(view.handle_keydown(&KeyPress::new("Enter", true)), KeyOutcome::Default);
    assert_eq!(view.handle_keydown(&KeyPress::new("a", false)), KeyOutcome::Default);
}

#[test]
fn test_validate_shows_error_for_blank_body() {
    let mut view = editor();

    assert!(!view.validate(&PostData::new("", None)).unwrap());
    assert!(view.validate(&PostData::new("test", None)).unwrap());
    assert_eq!(view.surface().errors(), ["Please add a message".to_string()]);
}

#[test]
fn test_validates_normalized_text() {
    let mut view = editor();

    type_body(&mut view, "");
    let post = view.build_post_data();
    assert_eq!(post.body, "<p></p>");
    assert!(!view.validate(&post).unwrap());

    type_body(&mut view, "\n\n");
    let post = view.build_post_data();
    assert_eq!(post.body, "<p></p><p></p>");
    assert!(!view.validate(&post).unwrap());

    type_body(&mut view, "something");
    let post = view.build_post_data();
    assert_eq!(post.body, "<p>something</p>");
    assert!(view.validate(&post).unwrap());

    type_body(&mut view, "\nsomething");
    let post = view.build_post_data();
    assert_eq!(post.body, "<p></p><p>something</p>");
    assert!(view.validate(&post).unwrap());
}

#[test]
fn test_blank_submit_never_reaches_policy() {
    let mut view = editor();
    let mut policy = RecordingPolicy::default();
    type_body(&mut view, "   \n\n");

    assert_eq!(view.submit(&mut policy).unwrap(), SubmitOutcome::Rejected);
    assert!(policy.posts.is_empty());
    assert_eq!(view.surface().errors().len(), 1);
}

#[test]
fn test_native_placeholder_is_used() {
    let mut view = editor();
    type_body(&mut view, "");
    view.handle_blur(Field::Body);

    assert_eq!(view.surface().placeholder(Field::Body), Some("What would you like to say?"));
    assert_eq!(view.surface().value(Field::Body), "");
}

#[test]
fn test_non_empty_field_survives_blur() {
    let mut view = editor();
    type_body(&mut view, "abc");
    view.handle_blur(Field::Body);
    assert_eq!(view.surface().value(Field::Body), "abc");
}

#[test]
fn test_emulated_placeholder_restored_on_blur() {
    let mut view = rendered(MemorySurface::without_placeholders(), EditorConfig::default());
    assert!(!view.editor_state().placeholder_supported);
    assert_eq!(view.surface().value(Field::Body), "What would you like to say?");

    view.handle_focus(Field::Body);
    assert_eq!(view.surface().value(Field::Body), "");

    view.handle_blur(Field::Body);
    assert_eq!(view.surface().value(Field::Body), "What would you like to say?");
}

#[test]
fn test_emulated_placeholder_keeps_real_content() {
    let mut view = rendered(MemorySurface::without_placeholders(), EditorConfig::default());

    type_body(&mut view, "abc");
    view.handle_blur(Field::Body);
    assert_eq!(view.surface().value(Field::Body), "abc");

    view.handle_focus(Field::Body);
    assert_eq!(view.surface().value(Field::Body), "abc");
}

#[test]
fn test_emulated_placeholder_is_not_posted() {
    let mut view = rendered(MemorySurface::without_placeholders(), EditorConfig::default());
    let mut policy = RecordingPolicy::default();

    assert_eq!(view.submit(&mut policy).unwrap(), SubmitOutcome::Rejected);
    assert!(policy.posts.is_empty());
}

#[test]
fn test_custom_placeholder_text() {
    let config = EditorConfig::from_json(r#"{"placeholderText": "Reply..."}"#).unwrap();
    let view = rendered(MemorySurface::without_placeholders(), config);
    assert_eq!(view.surface().value(Field::Body), "Reply...");
}

#[test]
fn test_focus_marker_follows_focus() {
    let mut view = editor();
    view.handle_focus(Field::Body);
    assert!(view.surface().has_focus_marker());
    view.handle_blur(Field::Body);
    assert!(!view.surface().has_focus_marker());
}

#[test]
fn test_only_one_error_surface() {
    let mut view = editor();
    view.show_error("ERROR ERROR ERROR").unwrap();
    view.show_error("second").unwrap();

    assert_eq!(view.surface().errors(), ["ERROR ERROR ERROR".to_string()]);
    assert!(!view.surface().has_focus());
}

#[test]
fn test_dismissing_error_restores_focus() {
    let mut view = editor();
    view.show_error("oops").unwrap();

    assert!(view.dismiss_error());
    assert!(view.surface().errors().is_empty());
    assert!(view.surface().has_focus());
    assert!(!view.dismiss_error());

    view.show_error("again").unwrap();
    assert_eq!(view.surface().errors().len(), 1);
}

#[test]
fn test_error_survives_rerender() {
    let mut view = editor();
    view.show_error("oops").unwrap();
    view.render().unwrap();
    assert_eq!(view.surface().errors(), ["oops".to_string()]);
}

#[test]
fn test_supports_line_breaks() {
    let mut view = editor();
    type_body(&mut view, "abc\ndef");
    assert_eq!(view.contents(), "<p>abc</p><p>def</p>");

    type_body(&mut view, "abc\n\ndef");
    assert_eq!(view.contents(), "<p>abc</p><p></p><p>def</p>");
}

#[test]
fn test_render_keeps_text() {
    let mut view = editor();
    type_body(&mut view, "FOEVAR");
    view.render().unwrap();
    assert_eq!(view.surface().value(Field::Body), "FOEVAR");
    assert_eq!(view.surface().render_count(), 2);
}

#[test]
fn test_resize_fills_mirror_and_sums_line_heights() {
    let mut view = rendered(MemorySurface::new().with_line_height(20.0), EditorConfig::default());
    type_body(&mut view, "abc\ndef");
    view.handle_keyup();

    assert_eq!(view.surface().mirror(), "<p>abc</p><p>def</p>");
    assert_eq!(view.surface().height(), 40.0);
}

#[test]
fn test_reset_clears_fields_and_height() {
    let mut view = titled_editor(MemorySurface::new());
    view.initialize();
    let original = view.surface().height();

    type_body(&mut view, "a\nb\nc");
    view.surface_mut().set_value(Field::Title, "titlem");
    view.handle_keyup();
    assert!(view.surface().height() > original);

    view.reset();
    assert_eq!(view.surface().value(Field::Body), "");
    assert_eq!(view.surface().value(Field::Title), "");
    assert_eq!(view.surface().mirror(), "");
    assert_eq!(view.surface().height(), original);
}

#[test]
fn test_set_contents_loads_markup() {
    let mut view = editor();
    view.set_contents("<p>abc</p><p></p><p>def</p>");
    assert_eq!(view.surface().value(Field::Body), "abc\n\ndef");
    assert_eq!(view.contents(), "<p>abc</p><p></p><p>def</p>");
}

#[test]
fn test_state_machine_transitions() {
    let mut view = editor();
    assert_eq!(view.state(), SurfaceState::BlankPlaceholder);

    view.handle_focus(Field::Body);
    assert_eq!(view.state(), SurfaceState::FocusedEmpty);

    type_body(&mut view, "hi");
    assert_eq!(view.state(), SurfaceState::HasContent);

    view.show_error("oops").unwrap();
    assert_eq!(view.state(), SurfaceState::ErrorShown);

    view.dismiss_error();
    assert_eq!(view.state(), SurfaceState::HasContent);

    view.reset();
    view.handle_blur(Field::Body);
    assert_eq!(view.state(), SurfaceState::BlankPlaceholder);
}

#[test]
fn test_i18n_overrides_error_message() {
    let config = EditorConfig::from_json(r#"{"i18n": {"errors": {"body": "Say something"}}}"#).unwrap();
    let mut view = rendered(MemorySurface::new(), config);
    let mut policy = RecordingPolicy::default();

    view.submit(&mut policy).unwrap();
    assert_eq!(view.surface().errors(), ["Say something".to_string()]);
}

#[test]
fn test_title_renders_when_enabled() {
    let view = titled_editor(MemorySurface::new());
    assert!(view.surface().has_field(Field::Title));
    assert_eq!(view.surface().placeholder(Field::Title), Some("Enter a title"));
}

#[test]
fn test_title_is_posted() {
    let mut view = titled_editor(MemorySurface::new());
    let mut policy = RecordingPolicy::default();
    type_body(&mut view, "body");
    view.surface_mut().set_value(Field::Title, "My title");

    view.submit(&mut policy).unwrap();
    assert_eq!(policy.posts[0].title.as_deref(), Some("My title"));
}

#[test]
fn test_title_emulated_placeholder_lifecycle() {
    let mut view = titled_editor(MemorySurface::without_placeholders());
    assert_eq!(view.surface().value(Field::Title), "Enter a title");

    view.handle_focus(Field::Title);
    assert_eq!(view.surface().value(Field::Title), "");

    view.handle_blur(Field::Title);
    assert_eq!(view.surface().value(Field::Title), "Enter a title");

    view.surface_mut().set_value(Field::Title, "abc");
    view.handle_blur(Field::Title);
    view.handle_focus(Field::Title);
    assert_eq!(view.surface().value(Field::Title), "abc");
}

#[test]
fn test_render_keeps_title() {
    let mut view = titled_editor(MemorySurface::new());
    view.surface_mut().set_value(Field::Title, "FOEVAR");
    view.render().unwrap();
    assert_eq!(view.surface().value(Field::Title), "FOEVAR");
}
