use serde::{Deserialize, Serialize};

/// Точка в мировых координатах
pub type Point3 = [f32; 3];

/// Диагональное смещение от точки привязки до излома выноски
pub const DIAGONAL_OFFSET: Point3 = [1.0, 1.0, 0.0];

/// Горизонтальное смещение от излома до конца выноски (место подписи)
pub const HORIZONTAL_OFFSET: Point3 = [0.5, 0.0, 0.0];

/// Идентификатор метки, уникальный в пределах сессии просмотра
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub u64);

impl std::fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn add(a: Point3, b: Point3) -> Point3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Точка излома выноски: anchor + DIAGONAL_OFFSET
pub fn leader_bend(anchor: Point3) -> Point3 {
    add(anchor, DIAGONAL_OFFSET)
}

/// Конец выноски: anchor + DIAGONAL_OFFSET + HORIZONTAL_OFFSET
pub fn leader_end(anchor: Point3) -> Point3 {
    add(leader_bend(anchor), HORIZONTAL_OFFSET)
}

/// Метка на поверхности модели.
///
/// Хранит только логические поля; визуальное представление принадлежит рендереру.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    /// Точка на поверхности, по которой был двойной клик
    pub anchor_point: Point3,
    /// Конец выноски, вычисляется один раз при создании
    pub leader_end: Point3,
    /// Термин; пустой только во время редактирования
    #[serde(default)]
    pub text: String,
}

impl Annotation {
    /// New annotation with empty text and its leader end derived from `anchor_point`.
    pub fn new(id: AnnotationId, anchor_point: Point3) -> Self {
        Self {
            id,
            anchor_point,
            leader_end: leader_end(anchor_point),
            text: String::new(),
        }
    }

    /// Bend point of the two-segment leader line.
    pub fn leader_bend(&self) -> Point3 {
        leader_bend(self.anchor_point)
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Справочная запись о кости (русское и латинское название)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoneReference {
    pub ru: &'static str,
    pub lat: &'static str,
}

const fn bone(ru: &'static str, lat: &'static str) -> BoneReference {
    BoneReference { ru, lat }
}

/// Список костей скелета человека для боковой панели
pub const BONE_CATALOG: &[BoneReference] = &[
    bone("Череп", "Cranium"),
    bone("Лобная кость", "Os frontale"),
    bone("Теменная кость", "Os parietale"),
    bone("Затылочная кость", "Os occipitale"),
    bone("Височная кость", "Os temporale"),
    bone("Клиновидная кость", "Os sphenoidale"),
    bone("Решетчатая кость", "Os ethmoidale"),
    bone("Носовая кость", "Os nasale"),
    bone("Верхняя челюсть", "Maxilla"),
    bone("Нижняя челюсть", "Mandibula"),
    bone("Скуловая кость", "Os zygomaticum"),
    bone("Слезная кость", "Os lacrimale"),
    bone("Небная кость", "Os palatinum"),
    bone("Сошник", "Vomer"),
    bone("Подъязычная кость", "Os hyoideum"),
    bone("Шейные позвонки", "Vertebrae cervicales"),
    bone("Грудные позвонки", "Vertebrae thoracicae"),
    bone("Поясничные позвонки", "Vertebrae lumbales"),
    bone("Крестец", "Os sacrum"),
    bone("Копчик", "Os coccygis"),
    bone("Рукоятка грудины", "Manubrium sterni"),
    bone("Тело грудины", "Corpus sterni"),
    bone("Мечевидный отросток", "Processus xiphoideus"),
    bone("Ребра", "Costae"),
    bone("Ключица", "Clavicula"),
    bone("Лопатка", "Scapula"),
    bone("Плечевая кость", "Humerus"),
    bone("Лучевая кость", "Radius"),
    bone("Локтевая кость", "Ulna"),
    bone("Кости запястья", "Ossa carpi"),
    bone("Пястные кости", "Ossa metacarpi"),
    bone("Фаланги пальцев кисти", "Phalanges digitorum manus"),
    bone("Тазовая кость", "Os coxae"),
    bone("Подвздошная кость", "Os ilium"),
    bone("Седалищная кость", "Os ischii"),
    bone("Лобковая кость", "Os pubis"),
    bone("Бедренная кость", "Femur"),
    bone("Надколенник", "Patella"),
    bone("Большеберцовая кость", "Tibia"),
    bone("Малоберцовая кость", "Fibula"),
    bone("Кости предплюсны", "Ossa tarsi"),
    bone("Плюсневые кости", "Ossa metatarsi"),
    bone("Фаланги пальцев стопы", "Phalanges digitorum pedis"),
];
