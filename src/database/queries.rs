pub mod photos {
    pub const INSERT: &str = r#"
    INSERT INTO photos (
        user_id
      , url
      , name
    ) VALUES (?, ?, ?)
    "#;

    pub const SELECT_BY_ID: &str = r#"
    SELECT id
         , user_id
         , url
         , name
         , created_at
      FROM photos
     WHERE id = ?
    "#;

    pub const SELECT_ALL_FOR_USER: &str = r#"
    SELECT id
         , user_id
         , url
         , name
         , created_at
      FROM photos
     WHERE user_id = ?
     ORDER BY id DESC
    "#;

    pub const COUNT_OWNED: &str = r#"
    SELECT COUNT(*)
      FROM photos
     WHERE user_id = ?
       AND id IN ({})
    "#;

    pub const SELECT_URL: &str = r#"
    SELECT url
      FROM photos
     WHERE id = ?
    "#;

    pub const UPDATE_NAME: &str = r#"
    UPDATE photos
       SET name = ?
     WHERE id = ?
    "#;

    pub const DELETE: &str = r#"
    DELETE FROM photos
     WHERE id = ?
    "#;
}

pub mod albums {
    pub const INSERT: &str = r#"
    INSERT INTO albums (
        user_id
      , name
      , description
    ) VALUES (?, ?, ?)
    "#;

    pub const SELECT_WITH_COUNT: &str = r#"
    SELECT a.id
         , a.user_id
         , a.name
         , a.description
         , a.image_url
         , COUNT(ap.photo_id) AS photo_count
         , a.created_at
      FROM albums AS a
      LEFT JOIN album_photos AS ap ON a.id = ap.album_id
     WHERE a.id = ?
     GROUP BY a.id
    "#;

    pub const SELECT_ALL_FOR_USER: &str = r#"
    SELECT a.id
         , a.user_id
         , a.name
         , a.description
         , a.image_url
         , COUNT(ap.photo_id) AS photo_count
         , a.created_at
      FROM albums AS a
      LEFT JOIN album_photos AS ap ON a.id = ap.album_id
     WHERE a.user_id = ?
     GROUP BY a.id
     ORDER BY a.created_at DESC, a.id DESC
    "#;

    pub const SELECT_OWNER: &str = r#"
    SELECT user_id
      FROM albums
     WHERE id = ?
    "#;

    pub const SELECT_OWNED_IDS: &str = r#"
    SELECT id
      FROM albums
     WHERE user_id = ?
       AND id IN ({})
     ORDER BY id
    "#;

    pub const UPDATE_DETAILS: &str = r#"
    UPDATE albums
       SET name = ?
         , description = ?
     WHERE id = ?
    "#;

    pub const UPDATE_IMAGE_URL: &str = r#"
    UPDATE albums
       SET image_url = ?
     WHERE id = ?
    "#;

    pub const DELETE: &str = r#"
    DELETE FROM albums
     WHERE id = ?
    "#;
}

pub mod album_photos {
    pub const INSERT: &str = r#"
    INSERT OR IGNORE INTO album_photos (
        album_id
      , photo_id
    ) VALUES (?, ?)
    "#;

    pub const SELECT_COVER: &str = r#"
    SELECT photo_id
      FROM album_photos
     WHERE album_id = ?
       AND is_cover = 1
    "#;

    pub const SET_COVER: &str = r#"
    UPDATE album_photos
       SET is_cover = 1
     WHERE album_id = ?
       AND photo_id = ?
    "#;

    pub const COUNT_COVERS_AMONG: &str = r#"
    SELECT COUNT(*)
      FROM album_photos
     WHERE album_id = ?
       AND is_cover = 1
       AND photo_id IN ({})
    "#;

    pub const DELETE_AMONG: &str = r#"
    DELETE FROM album_photos
     WHERE album_id = ?
       AND photo_id IN ({})
    "#;

    pub const SELECT_LOWEST_REMAINING: &str = r#"
    SELECT photo_id
      FROM album_photos
     WHERE album_id = ?
     ORDER BY photo_id
     LIMIT 1
    "#;

    pub const SELECT_COVERED_ALBUMS_FOR_PHOTO: &str = r#"
    SELECT album_id
      FROM album_photos
     WHERE photo_id = ?
       AND is_cover = 1
    "#;

    pub const DELETE_FOR_PHOTO: &str = r#"
    DELETE FROM album_photos
     WHERE photo_id = ?
    "#;

    pub const DELETE_FOR_ALBUM: &str = r#"
    DELETE FROM album_photos
     WHERE album_id = ?
    "#;

    pub const SELECT_PHOTOS: &str = r#"
    SELECT p.id
         , p.url
         , p.name
         , ap.is_cover
      FROM album_photos AS ap
      JOIN photos AS p ON p.id = ap.photo_id
     WHERE ap.album_id = ?
     ORDER BY p.id
    "#;
}

pub mod favourites {
    pub const DELETE_FOR_PHOTO: &str = r#"
    DELETE FROM favourites
     WHERE photo_id = ?
    "#;
}

pub mod hashtags {
    pub const INSERT_IF_MISSING: &str = r#"
    INSERT OR IGNORE INTO hashtags (name)
    VALUES (?)
    "#;

    pub const SELECT_ID_BY_NAME: &str = r#"
    SELECT id
      FROM hashtags
     WHERE name = ?
    "#;

    pub const LINK_PHOTO: &str = r#"
    INSERT OR IGNORE INTO photo_hashtags (photo_id, hashtag_id)
    VALUES (?, ?)
    "#;

    pub const SELECT_FOR_PHOTO: &str = r#"
    SELECT h.id
         , h.name
      FROM hashtags AS h
      JOIN photo_hashtags AS ph ON h.id = ph.hashtag_id
     WHERE ph.photo_id = ?
     ORDER BY h.name
    "#;

    pub const DELETE_LINKS_FOR_PHOTO: &str = r#"
    DELETE FROM photo_hashtags
     WHERE photo_id = ?
    "#;
}

pub mod users {
    pub const SELECT_FOR_TOKEN: &str = r#"
    SELECT id
      FROM users
     WHERE id = ?
    "#;
}

pub mod covers {
    pub const DEMOTE_EXTRA_COVERS: &str = r#"
    UPDATE album_photos
       SET is_cover = 0
     WHERE is_cover = 1
       AND photo_id > (
           SELECT MIN(c.photo_id)
             FROM album_photos AS c
            WHERE c.album_id = album_photos.album_id
              AND c.is_cover = 1
       )
    "#;

    pub const PROMOTE_MISSING_COVERS: &str = r#"
    UPDATE album_photos
       SET is_cover = 1
     WHERE photo_id = (
           SELECT MIN(l.photo_id)
             FROM album_photos AS l
            WHERE l.album_id = album_photos.album_id
       )
       AND NOT EXISTS (
           SELECT 1
             FROM album_photos AS c
            WHERE c.album_id = album_photos.album_id
              AND c.is_cover = 1
       )
    "#;

    pub const RESYNC_IMAGE_URLS: &str = r#"
    UPDATE albums
       SET image_url = COALESCE((
           SELECT p.url
             FROM album_photos AS ap
             JOIN photos AS p ON p.id = ap.photo_id
            WHERE ap.album_id = albums.id
              AND ap.is_cover = 1
       ), '')
    "#;

    pub const CREATE_UNIQUE_COVER_INDEX: &str = r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_album_photos_one_cover
        ON album_photos(album_id)
     WHERE is_cover = 1
    "#;
}
