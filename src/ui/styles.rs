use {
    crate::{
        config::PLOT_CONFIG,
        domain::{ConfidenceTier, RetestStatus, TradeDirection},
        ui::ui_config::UI_CONFIG,
    },
    eframe::egui::{
        Color32, CornerRadius, FontId, Response, RichText, Sense, Stroke, StrokeKind, Ui, Vec2,
        WidgetInfo, WidgetType,
    },
};

pub(crate) fn colored_subsection_heading(text: impl Into<String>) -> RichText {
    RichText::new(text.into()).color(UI_CONFIG.colors.subsection_heading)
}

pub trait SemanticColor {
    fn color(&self) -> Color32;
}

impl SemanticColor for TradeDirection {
    fn color(&self) -> Color32 {
        match self {
            Self::Long => PLOT_CONFIG.color_long,
            Self::Short => PLOT_CONFIG.color_short,
        }
    }
}

impl SemanticColor for ConfidenceTier {
    fn color(&self) -> Color32 {
        match self {
            Self::High => PLOT_CONFIG.color_confidence_high,
            Self::Medium => PLOT_CONFIG.color_confidence_medium,
            Self::Low => PLOT_CONFIG.color_confidence_low,
        }
    }
}

impl SemanticColor for RetestStatus {
    fn color(&self) -> Color32 {
        match self {
            Self::Confirmed => PLOT_CONFIG.color_long,
            Self::Failed => PLOT_CONFIG.color_short,
            Self::Pending => PLOT_CONFIG.color_warning,
            Self::None => PLOT_CONFIG.color_text_subdued,
        }
    }
}

pub(crate) trait UiStyleExt {
    /// Interactive label acting as button: transparent when idle, gray bg on hover, blue bg when selected.
    fn interactive_label(
        &mut self,
        text: &str,
        is_selected: bool,
        idle_color: Color32,
        font_id: FontId,
    ) -> Response;

    fn label_subdued(&mut self, text: impl Into<String>);
    fn metric(&mut self, label: &str, value: &str, color: Color32);
    fn label_subheader(&mut self, text: impl Into<String>);
    fn badge(&mut self, text: &str, fill: Color32);
}

impl UiStyleExt for Ui {
    fn interactive_label(
        &mut self,
        text: &str,
        is_selected: bool,
        idle_color: Color32,
        font_id: FontId,
    ) -> Response {
        let padding = Vec2::new(4.0, 4.0);
        let galley = self
            .painter()
            .layout_no_wrap(text.to_string(), font_id, idle_color);
        let desired_size = Vec2::new(
            self.available_width().max(galley.size().x + padding.x * 2.0),
            galley.size().y + padding.y * 2.0,
        );
        let (rect, response) = self.allocate_exact_size(desired_size, Sense::click());
        response.widget_info(|| WidgetInfo::selected(WidgetType::Button, true, is_selected, text));

        if self.is_rect_visible(rect) {
            let visuals = self.style().visuals.clone();
            let (bg_fill, text_color) = if is_selected {
                (UI_CONFIG.colors.selected_row, Color32::WHITE)
            } else if response.hovered() || response.has_focus() {
                (visuals.widgets.hovered.bg_fill, Color32::YELLOW)
            } else {
                (Color32::TRANSPARENT, idle_color)
            };

            if is_selected || response.hovered() {
                self.painter().rect(
                    rect,
                    CornerRadius::same(4),
                    bg_fill,
                    Stroke::NONE,
                    StrokeKind::Inside,
                );
            }
            let text_pos = rect.left_top() + padding;
            self.painter().galley(text_pos, galley, text_color);
        }
        response
    }

    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(Color32::GRAY));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0; // Tight spacing
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).small().color(color));
        });
    }

    fn label_subheader(&mut self, text: impl Into<String>) {
        self.label(colored_subsection_heading(text));
    }

    fn badge(&mut self, text: &str, fill: Color32) {
        let galley = self
            .painter()
            .layout_no_wrap(text.to_string(), FontId::proportional(11.0), Color32::WHITE);
        let padding = Vec2::new(6.0, 2.0);
        let (rect, _) = self.allocate_exact_size(galley.size() + padding * 2.0, Sense::hover());
        if self.is_rect_visible(rect) {
            self.painter().rect(
                rect,
                CornerRadius::same(3),
                fill,
                Stroke::NONE,
                StrokeKind::Inside,
            );
            self.painter()
                .galley(rect.left_top() + padding, galley, Color32::WHITE);
        }
    }
}
