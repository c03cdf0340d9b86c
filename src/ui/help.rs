use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

pub fn draw_popup(f: &mut Frame, app: &App, area: Rect) {
    let kb = &app.config.keybindings;
    let key = |c: char| if c == ' ' { "Space".to_string() } else { c.to_string() };

    let help_text = format!(
        r#"
NAVIGATION
  {down}/{up} ↑/↓       Move up/down (scroll in details)
  {left}/{right} Tab       Focus events/details
  {top}/{bottom}           Go to top/bottom
  Ctrl+d/u      Page down/up

SELECTION
  {select:<13} Toggle event
  {select_all:<13} Select all / clear all
  {resolve:<13} Resolve selected events
  Esc           Clear selection

FILTERS (only with nothing selected)
  {entity:<13} Filter by entity
  {check:<13} Filter by check
  {status:<13} Filter by status
  {sort:<13} Sort order
  {search:<13} Edit filter expression
  {clear:<13} Clear filters

OTHER
  {ns:<13} Switch namespace
  {open:<13} Open namespace in browser
  {copy:<13} Copy event ID
  {refresh:<13} Refresh
  {help:<13} Toggle help
  {quit:<13} Quit
"#,
        down = key(kb.down),
        up = key(kb.up),
        left = key(kb.left),
        right = key(kb.right),
        top = key(kb.top),
        bottom = key(kb.bottom),
        select = key(kb.select),
        select_all = key(kb.select_all),
        resolve = key(kb.resolve),
        entity = key(kb.filter_entity),
        check = key(kb.filter_check),
        status = key(kb.filter_status),
        sort = key(kb.sort),
        search = key(kb.search),
        clear = key(kb.clear_filters),
        ns = key(kb.select_namespace),
        open = key(kb.open),
        copy = key(kb.copy_id),
        refresh = key(kb.refresh),
        help = key(kb.help),
        quit = key(kb.quit),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help - Press ? or Esc to close ");

    let inner = super::centered_rect(52, 34, area);
    f.render_widget(Clear, inner);

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, inner);
}
