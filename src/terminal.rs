// SPDX-License-Identifier: GPL-3.0-only

//! Terminal-based camera viewer
//!
//! Renders the composited preview (camera frame plus inspiration overlay)
//! to the terminal using Unicode half-block characters for improved
//! vertical resolution.

use crate::app::{AppModel, CameraState, Message, Operation, Services};
use crate::backends::picker::DialogPicker;
use crate::config::Config;
use crate::constants::{overlay, timing};
use crate::media::{Bitmap, load_image_file};
use crate::storage;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    widgets::Widget,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Run the terminal camera viewer
pub fn run(
    config: Config,
    config_path: Option<PathBuf>,
    reference: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Operations are spawned onto this runtime from the draw loop
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let picker = DialogPicker::new(dirs::picture_dir());
    let services = Services::from_config(&config, Arc::new(picker));
    let mut model = AppModel::new(config, services);

    if let Some(path) = reference {
        model.overlay.set_image(load_image_file(&path)?);
    }
    let previous = runtime.block_on(storage::latest_photo(model.config.photo_directory()));

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut model, previous);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    model.shutdown();
    if let Some(path) = config_path
        && let Err(e) = model.config.save(&path)
    {
        warn!(error = %e, "Failed to save settings");
    }

    result
}

/// Key actions of the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Send(KeyMessage),
    ToggleHelp,
    Quit,
}

/// Messages a key press maps to. Opacity steps are resolved against the
/// current value when sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyMessage {
    OpacityUp,
    OpacityDown,
    ToggleMirror,
    SwitchCamera,
    Capture,
    PickInspiration,
}

fn action_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('h') => Some(Action::ToggleHelp),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
            Some(Action::Send(KeyMessage::OpacityUp))
        }
        KeyCode::Char('-') | KeyCode::Down => Some(Action::Send(KeyMessage::OpacityDown)),
        KeyCode::Char('m') => Some(Action::Send(KeyMessage::ToggleMirror)),
        KeyCode::Char('f') => Some(Action::Send(KeyMessage::SwitchCamera)),
        KeyCode::Char(' ') | KeyCode::Char('p') => Some(Action::Send(KeyMessage::Capture)),
        KeyCode::Char('o') => Some(Action::Send(KeyMessage::PickInspiration)),
        _ => None,
    }
}

fn to_message(key: KeyMessage, model: &AppModel) -> Message {
    match key {
        KeyMessage::OpacityUp => {
            Message::OpacityChanged(model.overlay.opacity() + overlay::OPACITY_STEP)
        }
        KeyMessage::OpacityDown => {
            Message::OpacityChanged(model.overlay.opacity() - overlay::OPACITY_STEP)
        }
        KeyMessage::ToggleMirror => Message::ToggleMirror,
        KeyMessage::SwitchCamera => Message::SwitchCamera,
        KeyMessage::Capture => Message::Capture,
        KeyMessage::PickInspiration => Message::PickInspiration,
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: &mut AppModel,
    previous: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pending: Vec<Operation<Message>> = Vec::new();
    pending.extend(model.update(Message::Start));

    let mut frame_widget = FrameWidget::new();
    let mut show_help = false;

    loop {
        // Feed finished operations back into the model
        let mut finished = Vec::new();
        pending.retain_mut(|op| match op.try_take() {
            Some(Ok(message)) => {
                finished.push(message);
                false
            }
            Some(Err(e)) => {
                warn!(error = %e, "Background operation did not complete");
                false
            }
            None => true,
        });
        for message in finished {
            pending.extend(model.update(message));
        }

        if let Some(frame) = model.frame() {
            frame_widget.update_frame(frame);
        }

        let status_message = if show_help {
            build_help_message()
        } else {
            build_status_message(model, previous.as_deref())
        };

        // Draw
        terminal.draw(|f| {
            let area = f.area();

            // Reserve bottom line for status
            let camera_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };

            f.render_widget(&frame_widget, camera_area);

            // Render status bar
            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };

            let status = StatusBar {
                message: &status_message,
            };
            f.render_widget(status, status_area);
        })?;

        // Handle input with timeout for frame updates
        if event::poll(timing::INPUT_POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match action_for(key.code, key.modifiers) {
                Some(Action::Quit) => break,
                Some(Action::ToggleHelp) => show_help = !show_help,
                Some(Action::Send(key_message)) => {
                    show_help = false;
                    let message = to_message(key_message, model);
                    pending.extend(model.update(message));
                }
                None => {}
            }
        }
    }

    for op in &mut pending {
        op.cancel();
    }
    info!("Terminal viewer closed");
    Ok(())
}

fn build_status_message(model: &AppModel, previous: Option<&std::path::Path>) -> String {
    let camera = match &model.camera {
        CameraState::Idle => "idle".to_string(),
        CameraState::RequestingPermission => "waiting for permission".to_string(),
        CameraState::Unauthorized(status) => format!("camera access {}", status),
        CameraState::Starting => "starting".to_string(),
        CameraState::Running(device) => device.name.clone(),
        CameraState::Failed(e) => format!("error: {}", e),
    };

    let mut msg = format!(
        "{} | overlay {:.0}%",
        camera,
        model.overlay.opacity() * 100.0
    );
    if model.overlay.is_mirrored() {
        msg.push_str(" mirrored");
    }
    if model.is_capturing {
        msg.push_str(" | capturing...");
    } else if let Some(asset) = &model.last_saved {
        msg.push_str(&format!(" | saved: {}", asset.path.display()));
    } else if let Some(e) = &model.last_error {
        msg.push_str(&format!(" | {}", e));
    } else if let Some(path) = previous {
        msg.push_str(&format!(" | last: {}", path.display()));
    }
    msg.push_str(" | 'h' help | 'q' quit");
    msg
}

fn build_help_message() -> String {
    "space/p: Take picture | +/-: Opacity | m: Mirror | f: Flip camera | o: Open reference | h: Toggle help | q/Ctrl+C: Quit"
        .to_string()
}

/// Widget that renders a frame using half-block characters
struct FrameWidget {
    frame: Option<Bitmap>,
}

impl FrameWidget {
    fn new() -> Self {
        Self { frame: None }
    }

    fn update_frame(&mut self, frame: Bitmap) {
        self.frame = Some(frame);
    }
}

impl Widget for &FrameWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = &self.frame else {
            // No frame yet - show placeholder
            let msg = "Waiting for camera...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, ratatui::style::Style::default());
            }
            return;
        };

        if area.width == 0 || area.height == 0 {
            return;
        }

        // Calculate display dimensions maintaining aspect ratio
        // Each terminal cell displays 2 vertical pixels using half-block characters
        let frame_aspect = frame.width() as f64 / frame.height() as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64; // *2 because half-blocks

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            // Terminal is wider - fit to height
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            // Terminal is taller - fit to width
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        // Scale factors
        let x_scale = frame.width() as f64 / display_width as f64;
        let y_scale = frame.height() as f64 / (display_height * 2) as f64;

        // Upper half (▀) colored with fg, lower half with bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;

                if term_x >= area.x + area.width || term_y >= area.y + area.height {
                    continue;
                }

                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let top_color = sample_pixel(frame, src_x, src_y_top);
                let bottom_color = sample_pixel(frame, src_x, src_y_bottom);

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(top_color);
                    cell.set_bg(bottom_color);
                }
            }
        }
    }
}

fn sample_pixel(frame: &Bitmap, x: u32, y: u32) -> Color {
    let x = x.min(frame.width() - 1);
    let y = y.min(frame.height() - 1);
    let [r, g, b, _] = frame.rgba_at(x, y);
    Color::Rgb(r, g, b)
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        // Truncate on a character boundary; paths may not be ASCII
        let text: String = self.message.chars().take(area.width as usize).collect();

        buf.set_string(
            area.x,
            area.y,
            text,
            ratatui::style::Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        let none = KeyModifiers::NONE;
        assert_eq!(
            action_for(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Action::Quit)
        );
        assert_eq!(action_for(KeyCode::Char('c'), none), None);
        assert_eq!(
            action_for(KeyCode::Char(' '), none),
            Some(Action::Send(KeyMessage::Capture))
        );
        assert_eq!(
            action_for(KeyCode::Char('f'), none),
            Some(Action::Send(KeyMessage::SwitchCamera))
        );
        assert_eq!(
            action_for(KeyCode::Char('o'), none),
            Some(Action::Send(KeyMessage::PickInspiration))
        );
    }

    #[test]
    fn test_frame_widget_draws_half_blocks() {
        let data = [[255u8, 0, 0, 255], [0, 0, 255, 255]].concat();
        let mut widget = FrameWidget::new();
        widget.update_frame(
            Bitmap::from_packed(1, 2, crate::media::PixelLayout::Rgba8, data).unwrap(),
        );

        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
    }
}
