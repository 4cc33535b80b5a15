use eframe::egui::{Context, Event, Key, Pos2, Rect};

use super::super::ViewModel;
use super::super::navigation::Command;
use super::super::render_utils::{Projected, circle_visible};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum KeyAction {
    Navigate(Command),
    ToggleNotes,
}

pub(in crate::app) fn action_for_key(key: Key) -> Option<KeyAction> {
    let action = match key {
        Key::A | Key::ArrowLeft => KeyAction::Navigate(Command::SelectPrevious),
        Key::D | Key::ArrowRight => KeyAction::Navigate(Command::SelectNext),
        Key::W | Key::ArrowUp => KeyAction::Navigate(Command::CommitForward),
        Key::S | Key::ArrowDown => KeyAction::Navigate(Command::CommitBackward),
        Key::N => KeyAction::ToggleNotes,
        _ => return None,
    };
    Some(action)
}

impl ViewModel {
    /// Key presses are dropped while a text field owns the keyboard.
    pub(in crate::app) fn handle_keys(&mut self, ctx: &Context) {
        if self.scene.input_captured() {
            return;
        }

        let actions = ctx.input(|input| {
            input
                .events
                .iter()
                .filter_map(|event| match event {
                    Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        modifiers,
                        ..
                    } if modifiers.is_none() => action_for_key(*key),
                    _ => None,
                })
                .collect::<Vec<_>>()
        });

        for action in actions {
            match action {
                KeyAction::Navigate(command) => {
                    self.scene.apply(command);
                }
                KeyAction::ToggleNotes => self.show_notes = !self.show_notes,
            }
        }
    }

    pub(in crate::app) fn hovered_node(
        pointer: Option<Pos2>,
        rect: Rect,
        projected: &[Option<Projected>],
        radii: &[f32],
    ) -> Option<usize> {
        let pointer = pointer?;
        projected
            .iter()
            .zip(radii)
            .enumerate()
            .filter_map(|(index, (projected, radius))| {
                let projected = projected.as_ref()?;
                if !circle_visible(rect, projected.screen, *radius) {
                    return None;
                }
                let distance = projected.screen.distance(pointer);
                (distance <= *radius).then_some((index, projected.depth))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}
