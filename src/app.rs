use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{info, warn};

use crate::analysis::Analysis;
use crate::store::TaskStore;
use crate::task::{NewTask, Task, DATE_FORMAT};

pub const MENU_ITEMS: [&str; 3] = ["Add Task", "View Tasks", "Analysis"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Task,
    Time,
    Date,
    RepeatDaily,
}

impl FormField {
    const ALL: [FormField; 4] = [Self::Task, Self::Time, Self::Date, Self::RepeatDaily];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Task => "Task Name",
            Self::Time => "Time (HH:MM)",
            Self::Date => "Date (YYYY-MM-DD)",
            Self::RepeatDaily => "Repeat Daily",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub task: String,
    pub time: String,
    pub date: String,
    pub repeat_daily: bool,
    pub focus: FormField,
    pub error: Option<String>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            task: String::new(),
            time: String::new(),
            date: Local::now().format(DATE_FORMAT).to_string(),
            repeat_daily: false,
            focus: FormField::Task,
            error: None,
        }
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Task => Some(&mut self.task),
            FormField::Time => Some(&mut self.time),
            FormField::Date => Some(&mut self.date),
            FormField::RepeatDaily => None,
        }
    }

    fn to_new_task(&self) -> crate::Result<NewTask> {
        NewTask::new(&self.task, &self.time, &self.date, self.repeat_daily)
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Menu,
    AddTask(TaskForm),
    ViewTasks,
    Analysis(Analysis),
}

pub struct App {
    store: TaskStore,
    pub screen: Screen,
    pub selected_menu: usize,
    pub tasks: Vec<Task>,
    pub selected_task: usize,
    /// Status line shown under the menu.
    pub message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            screen: Screen::Menu,
            selected_menu: 0,
            tasks: Vec::new(),
            selected_task: 0,
            message: None,
            should_quit: false,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::AddTask(_) => self.handle_form_key(key),
            Screen::ViewTasks => self.handle_list_key(key),
            Screen::Analysis(_) => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.screen = Screen::Menu;
                }
            }
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Left | KeyCode::Up => {
                if self.selected_menu > 0 {
                    self.selected_menu -= 1;
                }
            }
            KeyCode::Right | KeyCode::Down => {
                if self.selected_menu < MENU_ITEMS.len() - 1 {
                    self.selected_menu += 1;
                }
            }
            KeyCode::Enter => self.open_selected(),
            _ => {}
        }
    }

    pub fn open_selected(&mut self) {
        self.message = None;
        match self.selected_menu {
            0 => self.screen = Screen::AddTask(TaskForm::new()),
            1 => {
                if self.reload_tasks() {
                    self.selected_task = 0;
                    self.screen = Screen::ViewTasks;
                }
            }
            _ => match self.store.analyze() {
                Ok(report) => self.screen = Screen::Analysis(report),
                Err(err) => self.report_error("analyze tasks", &err),
            },
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Screen::AddTask(form) = &mut self.screen else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.screen = Screen::Menu,
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
            KeyCode::Char(' ') if form.focus == FormField::RepeatDaily => {
                form.repeat_daily = !form.repeat_daily;
            }
            KeyCode::Char(c) => {
                if let Some(field) = form.field_mut() {
                    field.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = form.field_mut() {
                    field.pop();
                }
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Screen::AddTask(form) = &mut self.screen else {
            return;
        };

        let new_task = match form.to_new_task() {
            Ok(new_task) => new_task,
            Err(err) => {
                form.error = Some(err.to_string());
                return;
            }
        };

        match self.store.add_task(&new_task) {
            Ok(task) => {
                info!(id = task.id, "task added from form");
                self.message = Some(format!("Added task #{}", task.id));
                self.screen = Screen::Menu;
            }
            Err(err) => {
                warn!("failed to add task: {err}");
                form.error = Some(err.to_string());
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Menu,
            KeyCode::Up => {
                if self.selected_task > 0 {
                    self.selected_task -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_task + 1 < self.tasks.len() {
                    self.selected_task += 1;
                }
            }
            KeyCode::Enter => self.toggle_selected(),
            _ => {}
        }
    }

    /// Flip the selected task between Pending and Completed.
    pub fn toggle_selected(&mut self) {
        let Some(task) = self.tasks.get(self.selected_task) else {
            return;
        };
        let (id, status) = (task.id, task.toggled_status());

        if let Err(err) = self.store.set_status(id, status) {
            self.report_error("update task", &err);
            return;
        }
        self.reload_tasks();
    }

    fn reload_tasks(&mut self) -> bool {
        match self.store.list_tasks() {
            Ok(tasks) => {
                self.tasks = tasks;
                self.selected_task = self.selected_task.min(self.tasks.len().saturating_sub(1));
                true
            }
            Err(err) => {
                self.report_error("load tasks", &err);
                false
            }
        }
    }

    fn report_error(&mut self, action: &str, err: &crate::KarmaError) {
        warn!("failed to {action}: {err}");
        self.message = Some(format!("Failed to {action}: {err}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{COMPLETED, PENDING};

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app() -> App {
        App::new(TaskStore::in_memory().unwrap())
    }

    fn fill_form(app: &mut App, task: &str, time: &str, date: &str) {
        type_text(app, task);
        press(app, KeyCode::Tab);
        type_text(app, time);
        press(app, KeyCode::Tab);
        if let Screen::AddTask(form) = &mut app.screen {
            form.date.clear();
        }
        type_text(app, date);
    }

    #[test]
    fn menu_navigation_is_clamped() {
        let mut app = app();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected_menu, 0);
        for _ in 0..5 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.selected_menu, MENU_ITEMS.len() - 1);
    }

    #[test]
    fn q_quits_from_menu() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn form_prefills_today() {
        let form = TaskForm::new();
        assert_eq!(form.date, Local::now().format(DATE_FORMAT).to_string());
        assert_eq!(form.focus, FormField::Task);
    }

    #[test]
    fn submitting_form_stores_task_and_returns_to_menu() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.screen, Screen::AddTask(_)));

        fill_form(&mut app, "Walk dog", "08:30", "2024-06-01");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::Menu);
        assert!(app.message.as_deref().unwrap().starts_with("Added task #"));

        let tasks = app.store().list_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task, "Walk dog");
        assert_eq!(tasks[0].time, "08:30");
        assert_eq!(tasks[0].date, "2024-06-01");
        assert!(tasks[0].repeat_daily);
        assert_eq!(tasks[0].status, PENDING);
    }

    #[test]
    fn invalid_form_stays_open_with_error() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        fill_form(&mut app, "Walk dog", "half past", "2024-06-01");
        press(&mut app, KeyCode::Enter);

        let Screen::AddTask(form) = &app.screen else {
            panic!("form closed on invalid input");
        };
        assert!(form.error.as_deref().unwrap().contains("invalid time"));
        assert!(app.store().list_tasks().unwrap().is_empty());
    }

    #[test]
    fn backspace_and_escape_in_form() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Typo!");
        press(&mut app, KeyCode::Backspace);
        if let Screen::AddTask(form) = &app.screen {
            assert_eq!(form.task, "Typo");
        }
        press(&mut app, KeyCode::BackTab);
        if let Screen::AddTask(form) = &app.screen {
            assert_eq!(form.focus, FormField::RepeatDaily);
        }
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Menu);
    }

    #[test]
    fn view_tasks_toggles_status() {
        let mut app = app();
        app.store()
            .add_task(&NewTask::new("Read", "21:00", "2024-06-01", false).unwrap())
            .unwrap();

        app.selected_menu = 1;
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::ViewTasks);
        assert_eq!(app.tasks.len(), 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tasks[0].status, COMPLETED);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tasks[0].status, PENDING);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Menu);
    }

    #[test]
    fn toggle_on_empty_list_is_a_no_op() {
        let mut app = app();
        app.selected_menu = 1;
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selected_task, 0);
        assert!(app.message.is_none());
    }

    #[test]
    fn analysis_screen_shows_report() {
        let mut app = app();
        app.selected_menu = 2;
        press(&mut app, KeyCode::Enter);

        let Screen::Analysis(report) = &app.screen else {
            panic!("expected analysis screen");
        };
        assert_eq!(report.most_common_time_label(), "N/A");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Menu);
    }
}
