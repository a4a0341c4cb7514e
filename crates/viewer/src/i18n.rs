use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lang {
    #[default]
    Ru,
    En,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=Ru (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Lang::En,
        _ => Lang::Ru,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::Ru => 0,
            Lang::En => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if ru { "Файл" } else { "File" },
        "menu.open_model" => if ru { "Открыть модель..." } else { "Open model..." },
        "menu.open_model_title" => if ru { "Открыть модель OBJ" } else { "Open OBJ model" },
        "menu.demo_model" => if ru { "Демонстрационная модель" } else { "Demo specimen" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.side_panel" => if ru { "Боковая панель" } else { "Side panel" },
        "menu.reset_camera" => if ru { "Сбросить камеру" } else { "Reset camera" },
        "menu.settings" => if ru { "Настройки..." } else { "Settings..." },
        "menu.language" => if ru { "Язык" } else { "Language" },

        // ── Side panel ──────────────────────────────────────
        "panel.bones" => if ru { "Кости скелета" } else { "Skeleton bones" },
        "panel.labels" => if ru { "Метки" } else { "Labels" },
        "panel.untitled" => if ru { "Без названия" } else { "Untitled" },
        "panel.delete" => if ru { "Удалить метку" } else { "Delete label" },
        "panel.no_labels" => if ru { "Меток пока нет" } else { "No labels yet" },
        "panel.hint" => if ru {
            "Двойной клик по модели добавляет метку"
        } else {
            "Double-click the model to add a label"
        },
        "panel.fill_term" => if ru { "Подставить термин" } else { "Use this term" },

        // ── Inline editor ───────────────────────────────────
        "editor.placeholder" => if ru { "Введите термин" } else { "Enter a term" },
        "editor.ok" => if ru { "OK" } else { "OK" },

        // ── Status bar ──────────────────────────────────────
        "status.loading" => if ru { "Загрузка модели..." } else { "Loading model..." },
        "status.no_model" => if ru { "Модель не загружена" } else { "No model loaded" },
        "status.load_error" => if ru { "Ошибка загрузки" } else { "Load error" },
        "status.editing" => if ru { "Редактирование метки" } else { "Editing label" },
        "status.labels" => if ru { "Метки" } else { "Labels" },
        "status.triangles" => if ru { "Треугольники" } else { "Triangles" },

        // ── Settings dialog ─────────────────────────────────
        "settings.title" => if ru { "Настройки" } else { "Settings" },
        "settings.viewport" => if ru { "Вьюпорт" } else { "Viewport" },
        "settings.bg_color" => if ru { "Цвет фона" } else { "Background color" },
        "settings.axes_visible" => if ru { "Показывать оси" } else { "Show axes" },
        "settings.annotations" => if ru { "Метки" } else { "Labels" },
        "settings.marker_color" => if ru { "Цвет маркера" } else { "Marker color" },
        "settings.leader_color" => if ru { "Цвет выноски" } else { "Leader color" },
        "settings.camera" => if ru { "Камера" } else { "Camera" },
        "settings.min_distance" => if ru { "Мин. расстояние" } else { "Min distance" },
        "settings.max_distance" => if ru { "Макс. расстояние" } else { "Max distance" },
        "settings.ui" => if ru { "Интерфейс" } else { "Interface" },
        "settings.font_size" => if ru { "Размер шрифта" } else { "Font size" },
        "settings.apply" => if ru { "Применить" } else { "Apply" },
        "settings.reset" => if ru { "Сбросить" } else { "Reset" },
        "settings.close" => if ru { "Закрыть" } else { "Close" },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_language() {
        set_lang(Lang::En);
        assert_eq!(t("panel.untitled"), "Untitled");
        set_lang(Lang::Ru);
        assert_eq!(t("panel.untitled"), "Без названия");
        assert_eq!(t("no.such.key"), "???");
    }
}
