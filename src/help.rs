use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Paragraph, Widget},
};

static TEXT: &[&str] = &[
    "h, LEFT         Select previous cell",
    "l, RIGHT        Select next cell",
    "k, UP           Select cell above",
    "j, DOWN         Select cell below",
    "0, HOME         Select today",
    "ENTER, SPACE    Write a note for the selection",
    "d               Show days",
    "m               Show months",
    "w               Show weeks",
    "TAB             Show next granularity",
    "?               Show this help",
    "q, ESC          Quit; ESC first clears any selection",
    "",
    "Press the Any Key to dismiss.",
];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Text::from_iter(TEXT.iter().map(|&s| Line::raw(s)));
        // Borders plus one column of padding on either side
        let frame_width = 4;
        let frame_height = 2;
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(frame_width)
            .min(area.width);
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(frame_height)
            .min(area.height);
        let [popup] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [popup] = Layout::vertical([height]).flex(Flex::Center).areas(popup);
        Clear.render(popup, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center)
                    .padding(Padding::horizontal(1)),
            )
            .style(self.0)
            .render(popup, buf);
    }
}
