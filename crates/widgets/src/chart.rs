use iced::widget::canvas::{self, Cache, Canvas, Frame, Geometry, Path, Stroke, Text};
use iced::{mouse, Element, Length, Point, Rectangle, Renderer, Size};
use vibe_core::{event::Message, Chart, RenderSurface, SeriesSource, SlidingSeriesBuffer};
use vibe_renderer::{label_ticks, value_ticks, window_polylines, PlotArea};
use vibe_theme::Theme;

/// Space reserved around the plot for axis labels and the legend.
const MARGIN_LEFT:   f32 = 40.0;
const MARGIN_TOP:    f32 = 28.0;
const MARGIN_RIGHT:  f32 = 12.0;
const MARGIN_BOTTOM: f32 = 24.0;

const X_TICKS: usize = 8;
const Y_DIVISIONS: usize = 4;

/// Canvas-backed rendering surface for the rolling chart.
///
/// Geometry is cached between frames; a redraw request drops the cache so
/// the next frame repaints from the window.
pub struct ChartSurface {
    cache:   Cache,
    redraws: u64,
}

impl ChartSurface {
    pub fn new() -> Self {
        Self { cache: Cache::new(), redraws: 0 }
    }

    /// Number of redraw requests received so far.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}

impl Default for ChartSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChartSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartSurface")
            .field("redraws", &self.redraws)
            .finish_non_exhaustive()
    }
}

impl RenderSurface for ChartSurface {
    fn redraw(&mut self, _window: &SlidingSeriesBuffer) {
        self.cache.clear();
        self.redraws += 1;
    }
}

/// Line chart of every tracked series over the sliding window.
#[derive(Debug, Default)]
pub struct ChartWidget;

impl ChartWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view<'a>(
        &'a self,
        chart:   &'a Chart<ChartSurface>,
        legend:  &'a [SeriesSource],
        y_range: (f64, f64),
        theme:   &'a Theme,
    ) -> Element<'a, Message> {
        Canvas::new(ChartProgram {
            window: chart.window(),
            cache:  &chart.surface().cache,
            legend,
            y_range,
            theme,
        })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }
}

struct ChartProgram<'a> {
    window:  &'a SlidingSeriesBuffer,
    cache:   &'a Cache,
    legend:  &'a [SeriesSource],
    y_range: (f64, f64),
    theme:   &'a Theme,
}

impl canvas::Program<Message> for ChartProgram<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &(),
        renderer: &Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        vec![self.cache.draw(renderer, bounds.size(), |frame| self.paint(frame))]
    }
}

impl ChartProgram<'_> {
    fn paint(&self, frame: &mut Frame) {
        let size = frame.size();
        let area = PlotArea::inset(
            size.width,
            size.height,
            MARGIN_LEFT,
            MARGIN_TOP,
            MARGIN_RIGHT,
            MARGIN_BOTTOM,
        );
        if area.width <= 0.0 || area.height <= 0.0 {
            return;
        }

        self.paint_grid(frame, &area);
        self.paint_series(frame, &area);
        self.paint_legend(frame);
    }

    fn paint_grid(&self, frame: &mut Frame, area: &PlotArea) {
        let grid = Stroke::default().with_color(self.theme.grid.into()).with_width(1.0);
        let label_size = self.theme.font_size * 0.8;

        for value in value_ticks(self.y_range, Y_DIVISIONS) {
            let y = area.y_at(value, self.y_range);
            frame.stroke(
                &Path::line(Point::new(area.x, y), Point::new(area.x + area.width, y)),
                grid,
            );
            frame.fill_text(self.label(format!("{value:.2}"), Point::new(2.0, y - label_size / 2.0)));
        }

        let len = self.window.capacity();
        for (index, label) in label_ticks(self.window.labels(), X_TICKS) {
            let x = area.x_at(index, len);
            frame.stroke(
                &Path::line(Point::new(x, area.y + area.height), Point::new(x, area.y + area.height + 4.0)),
                grid,
            );
            frame.fill_text(self.label(label.to_string(), Point::new(x - 6.0, area.y + area.height + 6.0)));
        }
    }

    fn paint_series(&self, frame: &mut Frame, area: &PlotArea) {
        let width = self.theme.line_width;

        for (index, pieces) in window_polylines(area, self.window, self.y_range).into_iter().enumerate() {
            let color = iced::Color::from(self.theme.series_color(index));

            for piece in pieces {
                let points: Vec<Point> = piece.iter().map(|p| Point::new(p.x, p.y)).collect();
                match points.as_slice() {
                    [] => {}
                    [single] => frame.fill(&Path::circle(*single, width), color),
                    [first, rest @ ..] => {
                        let path = Path::new(|b| {
                            b.move_to(*first);
                            for p in rest {
                                b.line_to(*p);
                            }
                        });
                        frame.stroke(&path, Stroke::default().with_color(color).with_width(width));
                    }
                }
            }
        }
    }

    fn paint_legend(&self, frame: &mut Frame) {
        let swatch = Size::new(14.0, 4.0);
        let mut x = MARGIN_LEFT;

        for (index, source) in self.legend.iter().enumerate() {
            let color = iced::Color::from(self.theme.series_color(index));
            frame.fill_rectangle(Point::new(x, MARGIN_TOP / 2.0 - 2.0), swatch, color);
            frame.fill_text(self.label(
                source.label().to_string(),
                Point::new(x + swatch.width + 6.0, MARGIN_TOP / 2.0 - self.theme.font_size * 0.45),
            ));
            x += swatch.width + 16.0 + legend_width(source.label(), self.theme.font_size);
        }
    }

    fn label(&self, content: String, position: Point) -> Text {
        Text {
            content,
            position,
            color: self.theme.foreground.into(),
            size: (self.theme.font_size * 0.8).into(),
            ..Text::default()
        }
    }
}

/// Rough text advance; the canvas has no measuring API.
fn legend_width(label: &str, font_size: f32) -> f32 {
    label.chars().count() as f32 * font_size * 0.6
}
